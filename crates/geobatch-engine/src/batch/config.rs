use super::error::BatchError;

/// What [`end`](super::GeometryBatch::end) does with polygons whose
/// triangulation has not produced indices yet.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum IncompleteTessellation {
    /// Block until every triangulation of the batch has finished. Polygons
    /// whose triangulation failed are skipped and counted.
    #[default]
    Wait,
    /// Do not wait; stop packing at the first polygon without indices.
    /// Everything sorted after it is dropped for this frame.
    Truncate,
}

/// Renderer-wide configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Vertex scratch capacity per draw call. Bounded by the u16 index range.
    pub max_vertices: usize,
    /// Index scratch capacity per draw call.
    pub max_indices: usize,
    /// Submission slots added per growth step.
    pub block_len: usize,
    /// Tessellation worker count. `None` = available parallelism.
    pub worker_threads: Option<usize>,
    /// Shift the projection by half a pixel (for backends with D3D9-style
    /// texel centers).
    pub half_pixel_offset: bool,
    pub incomplete: IncompleteTessellation,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_vertices: 32_768,
            max_indices: 65_536,
            block_len: 256,
            worker_threads: None,
            half_pixel_offset: false,
            incomplete: IncompleteTessellation::Wait,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), BatchError> {
        if !(4..=65_536).contains(&self.max_vertices) {
            return Err(BatchError::Config(format!(
                "max_vertices must be in 4..=65536, got {}",
                self.max_vertices
            )));
        }
        if self.max_indices < 6 {
            return Err(BatchError::Config(format!(
                "max_indices must be at least 6, got {}",
                self.max_indices
            )));
        }
        if self.block_len == 0 {
            return Err(BatchError::Config("block_len must be non-zero".into()));
        }
        if self.worker_threads == Some(0) {
            return Err(BatchError::Config("worker_threads must be non-zero".into()));
        }
        Ok(())
    }

    /// Resolved worker count.
    pub fn workers(&self) -> usize {
        self.worker_threads.unwrap_or_else(available_workers)
    }
}

pub(crate) fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn vertex_capacity_outside_u16_range_is_rejected() {
        let cfg = BatchConfig { max_vertices: 65_537, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(BatchError::Config(_))));

        let cfg = BatchConfig { max_vertices: 3, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(BatchError::Config(_))));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let cfg = BatchConfig { worker_threads: Some(0), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_worker_count_wins() {
        let cfg = BatchConfig { worker_threads: Some(3), ..Default::default() };
        assert_eq!(cfg.workers(), 3);
    }
}
