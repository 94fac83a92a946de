// flowstep/src/catalog.rs

//! The data catalog collaborator: load/save addressed by dataset name.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use parking_lot::RwLock;

/// A registry of named datasets.
///
/// Steps only ever address datasets through the names produced by their
/// bindings; how and where a dataset is stored is up to the implementation.
pub trait DataCatalog: Send + Sync {
  type Dataset;

  fn load(&self, name: &str) -> anyhow::Result<Self::Dataset>;

  fn save(&self, name: &str, data: Self::Dataset) -> anyhow::Result<()>;

  fn exists(&self, name: &str) -> bool;
}

/// An in-process catalog keeping datasets in a map.
///
/// Loads return clones, so `D` is typically cheap to clone (e.g. an `Arc`).
#[derive(Debug)]
pub struct MemoryCatalog<D>(Arc<RwLock<HashMap<String, D>>>);

impl<D> MemoryCatalog<D> {
  pub fn new() -> Self {
    MemoryCatalog(Arc::new(RwLock::new(HashMap::new())))
  }

  /// Seeds the catalog with a dataset, replacing any previous entry.
  pub fn with(self, name: impl Into<String>, data: D) -> Self {
    self.0.write().insert(name.into(), data);
    self
  }

  /// Dataset names currently held, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.0.read().keys().cloned().collect();
    names.sort();
    names
  }
}

impl<D> Clone for MemoryCatalog<D> {
  fn clone(&self) -> Self {
    MemoryCatalog(Arc::clone(&self.0))
  }
}

impl<D> Default for MemoryCatalog<D> {
  fn default() -> Self {
    Self::new()
  }
}

impl<D: Clone + Send + Sync> DataCatalog for MemoryCatalog<D> {
  type Dataset = D;

  fn load(&self, name: &str) -> anyhow::Result<D> {
    self
      .0
      .read()
      .get(name)
      .cloned()
      .ok_or_else(|| anyhow!("dataset '{}' is not in the catalog", name))
  }

  fn save(&self, name: &str, data: D) -> anyhow::Result<()> {
    self.0.write().insert(name.to_string(), data);
    Ok(())
  }

  fn exists(&self, name: &str) -> bool {
    self.0.read().contains_key(name)
  }
}
