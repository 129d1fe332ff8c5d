//! Configuration for the mapping engine.

/// Tunables for one mapping service instance.
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Number of source entities pulled and written per batch.
    pub batch_size: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}
