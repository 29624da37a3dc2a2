//! The batch front end: lifecycle, submission, and the render flush.

use std::sync::Arc;

use crate::coords::{Mat4, Viewport};

use super::backend::GraphicsBackend;
use super::buffer::SubmissionBuffer;
use super::config::{BatchConfig, IncompleteTessellation};
use super::error::{BatchError, UsageError};
use super::flush::{FlushStats, Packer};
use super::polygon::{Polygon, TextureHandle, Vertex};
use super::scheduler::{PolygonFailure, TessellationScheduler};
use super::sort::{compare_keys, SortMode};
use super::state::BatchSettings;
use super::texel::TexelCache;

/// Outcome of one [`GeometryBatch::end`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub draw_calls: usize,
    pub polygons_drawn: usize,
    pub polygons_skipped: usize,
    pub polygons_truncated: usize,
    /// Triangulation failures of this batch, by submission slot.
    pub failures: Vec<PolygonFailure>,
}

impl FlushReport {
    fn new(stats: FlushStats, failures: Vec<PolygonFailure>) -> Self {
        Self {
            draw_calls: stats.draw_calls,
            polygons_drawn: stats.polygons_drawn,
            polygons_skipped: stats.polygons_skipped,
            polygons_truncated: stats.polygons_truncated,
            failures,
        }
    }
}

/// Batches textured polygons between `begin` and `end`.
///
/// Quads and triangles are indexed on the spot; larger outlines are
/// triangulated on worker threads while the caller keeps submitting.
/// `end` sorts by key, packs the polygons into as few draw calls as texture
/// changes and scratch capacity allow, and resets for the next batch.
///
/// ```no_run
/// # use geobatch_engine::batch::*;
/// # fn frame(backend: &mut impl GraphicsBackend, tex: TextureHandle) -> Result<(), BatchError> {
/// let mut batch = GeometryBatch::new(BatchConfig::default())?;
/// batch.begin(BatchSettings::default())?;
/// batch.draw_texture(tex, geobatch_engine::coords::Vec2::new(10.0, 10.0), geobatch_engine::paint::Color::WHITE)?;
/// let report = batch.end(backend)?;
/// # let _ = report;
/// # Ok(())
/// # }
/// ```
pub struct GeometryBatch {
    config: BatchConfig,
    buffer: SubmissionBuffer,
    scheduler: TessellationScheduler,
    packer: Packer,
    sorted: Vec<Polygon>,
    pub(super) texels: TexelCache,

    /// `Some` while a batch is open.
    settings: Option<BatchSettings>,
    projection: Option<(Viewport, Mat4)>,
    disposed: bool,
}

impl GeometryBatch {
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;

        let scheduler = TessellationScheduler::new(config.workers())?;
        let buffer = SubmissionBuffer::new(config.block_len);
        let packer = Packer::new(config.max_vertices, config.max_indices);

        Ok(Self {
            config,
            buffer,
            scheduler,
            packer,
            sorted: Vec::new(),
            texels: TexelCache::new(),
            settings: None,
            projection: None,
            disposed: false,
        })
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn begin(&mut self, settings: BatchSettings) -> Result<(), BatchError> {
        self.ensure_live()?;
        if self.settings.is_some() {
            return Err(UsageError::AlreadyOpen.into());
        }
        if !settings.sort_mode.is_supported() {
            return Err(BatchError::UnsupportedMode(settings.sort_mode));
        }

        log::debug!("batch begin ({:?})", settings.sort_mode);
        self.settings = Some(settings);
        Ok(())
    }

    /// Flushes the open batch to `backend`.
    ///
    /// The submission buffer is reset whatever the outcome.
    pub fn end<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<FlushReport, BatchError> {
        self.ensure_live()?;
        let Some(settings) = self.settings.take() else {
            return Err(UsageError::NotOpen { operation: "end" }.into());
        };

        let result = self.flush(backend, &settings);

        self.buffer.reset();
        self.sorted.clear();

        if let Ok(report) = &result {
            log::debug!(
                "batch end: {} polygons in {} draw calls ({} skipped, {} truncated)",
                report.polygons_drawn,
                report.draw_calls,
                report.polygons_skipped,
                report.polygons_truncated,
            );
        }
        result
    }

    /// Releases the batch. Later calls fail with [`BatchError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.settings = None;
        self.buffer.reset();
        self.sorted = Vec::new();
        self.disposed = true;
        log::debug!("geometry batch disposed");
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.settings.is_some()
    }

    /// `true` when nothing submitted is waiting for `end`.
    #[inline]
    pub fn is_rendered(&self) -> bool {
        self.buffer.is_empty()
    }

    /// `true` when no submitted polygon is still waiting for triangulation.
    pub fn is_tessellated(&self) -> bool {
        self.buffer.pending() == 0
    }

    // ── submission ────────────────────────────────────────────────────────

    /// Adds `polygon` to the open batch and returns its submission slot.
    ///
    /// Unindexed polygons are queued for triangulation without blocking.
    pub fn append(&mut self, polygon: Polygon) -> Result<usize, BatchError> {
        self.ensure_live()?;
        if self.settings.is_none() {
            return Err(UsageError::NotOpen { operation: "append" }.into());
        }

        let vertices = polygon.vertices().len();
        let indices = polygon.expected_index_count();
        if vertices > self.config.max_vertices || indices > self.config.max_indices {
            return Err(BatchError::PolygonTooLarge {
                vertices,
                indices,
                max_vertices: self.config.max_vertices,
                max_indices: self.config.max_indices,
            });
        }

        let needs_tessellation = !polygon.is_indexed();
        let (index, slot) = self.buffer.push(polygon);
        if needs_tessellation {
            self.scheduler.submit(index, slot);
        }
        Ok(index)
    }

    /// Submits an arbitrary outline. The sort key follows the batch's sort
    /// mode and `layer_depth`.
    pub fn draw_polygon(
        &mut self,
        texture: TextureHandle,
        vertices: impl Into<Arc<[Vertex]>>,
        layer_depth: f32,
    ) -> Result<usize, BatchError> {
        let key = self.sort_mode("draw_polygon")?.key_for_depth(layer_depth);
        let polygon = Polygon::new(texture, key, vertices)?;
        self.append(polygon)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    /// Polygons submitted to the open batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Submission slots allocated. Never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Triangulations queued or running.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.scheduler.in_flight()
    }

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Blocks until every queued triangulation has finished.
    pub fn wait_tessellation(&self) {
        self.scheduler.wait_idle();
    }

    /// Projection of `viewport` (top-left origin), cached per viewport.
    pub fn projection(&mut self, viewport: Viewport) -> Mat4 {
        if let Some((cached, proj)) = self.projection {
            if cached == viewport {
                return proj;
            }
        }

        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let mut proj = Mat4::orthographic_off_center(0.0, w, h, 0.0, 0.0, -1.0);
        if self.config.half_pixel_offset {
            proj.m[3][0] -= 0.5 * proj.m[0][0];
            proj.m[3][1] -= 0.5 * proj.m[1][1];
        }

        self.projection = Some((viewport, proj));
        proj
    }

    pub(super) fn sort_mode(&self, operation: &'static str) -> Result<SortMode, BatchError> {
        self.ensure_live()?;
        self.settings
            .as_ref()
            .map(|s| s.sort_mode)
            .ok_or_else(|| UsageError::NotOpen { operation }.into())
    }

    // ── flush ─────────────────────────────────────────────────────────────

    fn flush<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        settings: &BatchSettings,
    ) -> Result<FlushReport, BatchError> {
        let wvp = settings.transform * self.projection(backend.viewport());
        backend.apply_state(&settings.render_state(), &wvp);

        let effect = match settings.effect {
            Some(id) => match backend.effect_pass_count(id) {
                Some(passes) => Some((id, passes)),
                None => return Err(BatchError::Disposed("effect")),
            },
            None => None,
        };

        if self.config.incomplete == IncompleteTessellation::Wait {
            self.scheduler.wait_idle();
        }

        let generation = self.buffer.generation();
        self.buffer.drain_into(&mut self.sorted);

        // Stable: equal and NaN keys keep submission order.
        self.sorted
            .sort_by(|a, b| compare_keys(a.sort_key(), b.sort_key()));

        let stats = self
            .packer
            .pack(backend, &self.sorted, effect, self.config.incomplete);
        let failures = self.scheduler.take_failures(generation);

        Ok(FlushReport::new(stats, failures))
    }

    fn ensure_live(&self) -> Result<(), BatchError> {
        if self.disposed {
            Err(BatchError::Disposed("geometry batch"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::backend::recording::{Call, RecordingBackend};
    use crate::batch::polygon::{QuadStyle, TextureId, QUAD_INDICES};
    use crate::batch::state::EffectId;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;

    fn tex(id: u64) -> TextureHandle {
        TextureHandle::new(TextureId(id), 32, 32)
    }

    fn batch() -> GeometryBatch {
        GeometryBatch::new(BatchConfig { worker_threads: Some(2), ..Default::default() }).unwrap()
    }

    fn quad(texture: TextureHandle, key: f32) -> Polygon {
        Polygon::axis_quad(texture, key, Rect::new(0.0, 0.0, 8.0, 8.0), QuadStyle::default())
    }

    fn ngon(n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                let p = Vec2::new(50.0 + 30.0 * a.cos(), 50.0 + 30.0 * a.sin());
                Vertex::new(p, 0.0, Color::WHITE, Vec2::ZERO)
            })
            .collect()
    }

    fn star() -> Vec<Vertex> {
        (0..5)
            .map(|i| {
                let a = (i as f32) * 4.0 * std::f32::consts::PI / 5.0;
                let p = Vec2::new(50.0 + 40.0 * a.sin(), 50.0 - 40.0 * a.cos());
                Vertex::new(p, 0.0, Color::WHITE, Vec2::ZERO)
            })
            .collect()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn append_before_begin_is_usage_error() {
        let mut b = batch();
        let err = b.append(quad(tex(1), 0.0)).unwrap_err();
        assert!(matches!(err, BatchError::Usage(UsageError::NotOpen { operation: "append" })));
    }

    #[test]
    fn double_begin_is_usage_error() {
        let mut b = batch();
        b.begin(BatchSettings::default()).unwrap();
        let err = b.begin(BatchSettings::default()).unwrap_err();
        assert!(matches!(err, BatchError::Usage(UsageError::AlreadyOpen)));
    }

    #[test]
    fn end_without_begin_is_usage_error() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        assert!(matches!(
            b.end(&mut backend),
            Err(BatchError::Usage(UsageError::NotOpen { operation: "end" }))
        ));
    }

    #[test]
    fn immediate_and_texture_modes_are_rejected() {
        let mut b = batch();
        for mode in [SortMode::Immediate, SortMode::Texture] {
            let err = b.begin(BatchSettings::default().with_sort_mode(mode)).unwrap_err();
            assert!(matches!(err, BatchError::UnsupportedMode(m) if m == mode));
        }
        assert!(!b.is_open());
    }

    #[test]
    fn disposed_batch_rejects_everything() {
        let mut b = batch();
        b.dispose();
        assert!(b.is_disposed());
        assert!(matches!(b.begin(BatchSettings::default()), Err(BatchError::Disposed(_))));
        assert!(matches!(b.append(quad(tex(1), 0.0)), Err(BatchError::Disposed(_))));
    }

    #[test]
    fn round_trip_resets_but_keeps_capacity() {
        let mut b = GeometryBatch::new(BatchConfig {
            block_len: 4,
            worker_threads: Some(1),
            ..Default::default()
        })
        .unwrap();
        let mut backend = RecordingBackend::default();

        b.begin(BatchSettings::default()).unwrap();
        for _ in 0..10 {
            b.append(quad(tex(1), 0.0)).unwrap();
        }
        let grown = b.capacity();
        b.end(&mut backend).unwrap();

        assert_eq!(b.len(), 0);
        assert_eq!(b.capacity(), grown);
        assert!(grown >= 10);
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_batch_issues_no_draws() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.draw_calls, 0);
        assert!(backend.draws().is_empty());
        assert!(matches!(backend.calls[0], Call::ApplyState(..)));
    }

    #[test]
    fn two_textures_draw_in_key_order() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default().with_sort_mode(SortMode::FrontToBack)).unwrap();
        b.append(quad(tex(2), 0.9)).unwrap();
        b.append(quad(tex(1), 0.1)).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.draw_calls, 2);
        assert_eq!(backend.draw_textures(), vec![TextureId(1), TextureId(2)]);
    }

    #[test]
    fn equal_keys_are_all_drawn() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        b.append(quad(tex(1), 0.5)).unwrap();
        b.append(quad(tex(1), 0.5)).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.polygons_drawn, 2);
        assert_eq!(backend.draws()[0].0.len(), 8);
    }

    #[test]
    fn vertex_capacity_forces_extra_draw() {
        let mut b = GeometryBatch::new(BatchConfig {
            max_vertices: 8,
            worker_threads: Some(1),
            ..Default::default()
        })
        .unwrap();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        for _ in 0..3 {
            b.append(quad(tex(1), 0.0)).unwrap();
        }
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.draw_calls, 2);
        assert_eq!(backend.binds(), vec![TextureId(1)]);
    }

    #[test]
    fn oversized_polygon_is_rejected_at_append() {
        let mut b = GeometryBatch::new(BatchConfig {
            max_vertices: 8,
            worker_threads: Some(1),
            ..Default::default()
        })
        .unwrap();
        b.begin(BatchSettings::default()).unwrap();
        let err = b.draw_polygon(tex(1), ngon(9), 0.0).unwrap_err();
        assert!(matches!(err, BatchError::PolygonTooLarge { vertices: 9, .. }));
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn tessellated_polygons_are_drawn_after_wait() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        // Deferred keys are NaN: submission order.
        b.append(quad(tex(1), f32::NAN)).unwrap();
        b.draw_polygon(tex(1), ngon(7), 0.0).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.polygons_drawn, 2);
        assert!(report.failures.is_empty());
        let (vertices, indices) = backend.draws()[0];
        assert_eq!(vertices.len(), 11);
        assert_eq!(&indices[..6], &QUAD_INDICES);
        // Heptagon indices follow the quad's four vertices.
        assert_eq!(indices.len(), 6 + 15);
        assert!(indices[6..].iter().all(|&i| (4..11).contains(&i)));
    }

    #[test]
    fn failed_triangulation_is_reported_and_skipped() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        b.append(quad(tex(1), 0.0)).unwrap();
        let bad = b.draw_polygon(tex(1), star(), 0.0).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.polygons_drawn, 1);
        assert_eq!(report.polygons_skipped, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slot, bad);
    }

    #[test]
    fn disposed_effect_fails_and_resets() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default().with_effect(EffectId(4))).unwrap();
        b.append(quad(tex(1), 0.0)).unwrap();

        let err = b.end(&mut backend).unwrap_err();
        assert!(matches!(err, BatchError::Disposed("effect")));
        assert_eq!(b.len(), 0);
        assert!(!b.is_open());
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn registered_effect_draws_once_per_pass() {
        let mut b = batch();
        let mut backend = RecordingBackend {
            effects: vec![(EffectId(4), 3)],
            ..Default::default()
        };
        b.begin(BatchSettings::default().with_effect(EffectId(4))).unwrap();
        b.append(quad(tex(1), 0.0)).unwrap();
        let report = b.end(&mut backend).unwrap();
        assert_eq!(report.draw_calls, 3);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn transform_is_applied_before_projection() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        let shift = Mat4::translation(Vec2::new(400.0, 300.0));
        b.begin(BatchSettings::default().with_transform(shift)).unwrap();
        b.end(&mut backend).unwrap();

        let Call::ApplyState(_, wvp) = &backend.calls[0] else { panic!("state not applied first") };
        // Origin shifted to the viewport center lands on clip (0, 0).
        let p = wvp.transform_point2(Vec2::ZERO);
        approx::assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        approx::assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn half_pixel_offset_shifts_projection() {
        let mut b = GeometryBatch::new(BatchConfig {
            half_pixel_offset: true,
            worker_threads: Some(1),
            ..Default::default()
        })
        .unwrap();
        let proj = b.projection(Viewport::new(100.0, 100.0));
        let p = proj.transform_point2(Vec2::new(0.5, 0.5));
        approx::assert_relative_eq!(p.x, -1.0, epsilon = 1e-6);
        approx::assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    // ── state queries ─────────────────────────────────────────────────────

    #[test]
    fn is_rendered_until_something_is_submitted() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        assert!(b.is_rendered());

        b.append(quad(tex(1), 0.0)).unwrap();
        assert!(!b.is_rendered());
        assert_eq!(b.len(), 1);

        b.end(&mut backend).unwrap();
        assert!(b.is_rendered());
    }

    #[test]
    fn is_tessellated_tracks_pending_triangulation() {
        let mut b = batch();
        b.begin(BatchSettings::default()).unwrap();
        b.append(quad(tex(1), 0.0)).unwrap();
        assert!(b.is_tessellated());

        b.draw_polygon(tex(1), ngon(6), 0.0).unwrap();
        b.wait_tessellation();
        assert!(b.is_tessellated());
        assert!(!b.is_rendered());
    }

    // ── winding ───────────────────────────────────────────────────────────

    #[test]
    fn tessellated_polygon_shares_quad_winding() {
        let mut b = batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        b.append(quad(tex(1), f32::NAN)).unwrap();
        b.draw_polygon(tex(1), ngon(6), 0.0).unwrap();
        b.draw_polygon(tex(1), ngon(6).into_iter().rev().collect::<Vec<_>>(), 0.0).unwrap();
        let report = b.end(&mut backend).unwrap();
        assert_eq!(report.polygons_drawn, 3);

        let (vertices, indices) = backend.draws()[0];
        for tri in indices.chunks_exact(3) {
            let a = vertices[tri[0] as usize].xy();
            let bb = vertices[tri[1] as usize].xy();
            let c = vertices[tri[2] as usize].xy();
            let area = (bb.x - a.x) * (c.y - a.y) - (c.x - a.x) * (bb.y - a.y);
            assert!(area > 0.0, "triangle {tri:?} is wound against the quads");
        }
    }

    // ── truncating flush ──────────────────────────────────────────────────

    fn truncating_batch() -> GeometryBatch {
        GeometryBatch::new(BatchConfig {
            worker_threads: Some(1),
            incomplete: IncompleteTessellation::Truncate,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn truncate_stops_at_first_unindexed_polygon() {
        let mut b = truncating_batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        // Deferred keys are NaN: submission order. The star never gets indices.
        b.draw_polygon(tex(1), star(), 0.0).unwrap();
        b.append(quad(tex(1), f32::NAN)).unwrap();
        b.append(quad(tex(2), f32::NAN)).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.polygons_drawn, 0);
        assert_eq!(report.polygons_truncated, 3);
        assert_eq!(report.draw_calls, 0);
        assert!(backend.draws().is_empty());
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn truncate_draws_what_sorts_before_the_gap() {
        let mut b = truncating_batch();
        let mut backend = RecordingBackend::default();
        b.begin(BatchSettings::default()).unwrap();
        b.append(quad(tex(1), f32::NAN)).unwrap();
        b.append(quad(tex(1), f32::NAN)).unwrap();
        b.draw_polygon(tex(1), star(), 0.0).unwrap();
        b.append(quad(tex(2), f32::NAN)).unwrap();
        let report = b.end(&mut backend).unwrap();

        assert_eq!(report.polygons_drawn, 2);
        assert_eq!(report.polygons_truncated, 2);
        assert_eq!(report.draw_calls, 1);
        assert_eq!(backend.draw_textures(), vec![TextureId(1)]);
        assert_eq!(backend.draws()[0].0.len(), 8);
    }
}
