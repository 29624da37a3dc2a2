//! Packing of sorted polygons into scratch buffers and draw-call emission.

use super::backend::GraphicsBackend;
use super::config::IncompleteTessellation;
use super::polygon::{Polygon, TextureId, Vertex};
use super::state::EffectId;

/// Counters of one flush.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FlushStats {
    /// Backend draw calls issued (one per effect pass per segment).
    pub draw_calls: usize,
    pub polygons_drawn: usize,
    /// Polygons without indices skipped because their triangulation failed.
    pub polygons_skipped: usize,
    /// Polygons dropped by a truncating flush.
    pub polygons_truncated: usize,
}

/// Fixed-capacity vertex/index scratch, reused across flushes.
pub struct Packer {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    max_vertices: usize,
    max_indices: usize,
}

impl Packer {
    pub fn new(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_vertices,
            max_indices,
        }
    }

    /// Walks `sorted` once, flushing on texture change and on capacity
    /// overflow. Each polygon must fit the scratch on its own.
    pub fn pack<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        sorted: &[Polygon],
        effect: Option<(EffectId, usize)>,
        incomplete: IncompleteTessellation,
    ) -> FlushStats {
        let mut stats = FlushStats::default();
        let mut active: Option<TextureId> = None;

        for (i, polygon) in sorted.iter().enumerate() {
            let Some(indices) = polygon.indices() else {
                match incomplete {
                    IncompleteTessellation::Wait => {
                        stats.polygons_skipped += 1;
                        continue;
                    }
                    IncompleteTessellation::Truncate => {
                        stats.polygons_truncated = sorted.len() - i;
                        break;
                    }
                }
            };
            let vertices = polygon.vertices();
            let texture = polygon.texture().id;

            let texture_changed = active != Some(texture);
            let overflow = self.indices.len() + indices.len() > self.max_indices
                || self.vertices.len() + vertices.len() > self.max_vertices;

            if texture_changed || overflow {
                self.emit(backend, active, effect, &mut stats);
            }
            if texture_changed {
                backend.bind_texture(texture);
                active = Some(texture);
            }

            // Indices stay polygon-local; the copy is shifted to where this
            // polygon's vertices land in the scratch.
            let base = self.vertices.len();
            self.vertices.extend_from_slice(vertices);
            self.indices
                .extend(indices.iter().map(|&idx| (base + idx as usize) as u16));
            stats.polygons_drawn += 1;
        }

        self.emit(backend, active, effect, &mut stats);
        stats
    }

    fn emit<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        texture: Option<TextureId>,
        effect: Option<(EffectId, usize)>,
        stats: &mut FlushStats,
    ) {
        if !self.indices.is_empty() {
            match (effect, texture) {
                (Some((id, passes)), Some(texture)) => {
                    for pass in 0..passes {
                        backend.apply_effect_pass(id, pass);
                        // Effects may rebind texture slot 0.
                        backend.bind_texture(texture);
                        backend.draw_indexed_triangles(&self.vertices, &self.indices);
                        stats.draw_calls += 1;
                    }
                }
                _ => {
                    backend.draw_indexed_triangles(&self.vertices, &self.indices);
                    stats.draw_calls += 1;
                }
            }
        }

        self.vertices.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::backend::recording::{Call, RecordingBackend};
    use crate::batch::polygon::{QuadStyle, TextureHandle};
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;

    fn quad(tex: u64, x: f32) -> Polygon {
        let texture = TextureHandle::new(TextureId(tex), 16, 16);
        Polygon::axis_quad(texture, 0.0, Rect::new(x, 0.0, 10.0, 10.0), QuadStyle::default())
    }

    #[test]
    fn same_texture_packs_into_one_draw() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let polys = vec![quad(1, 0.0), quad(1, 20.0), quad(1, 40.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Wait);

        assert_eq!(stats.draw_calls, 1);
        let draws = backend.draws();
        assert_eq!(draws[0].0.len(), 12);
        // Second quad's indices are shifted by four vertices.
        assert_eq!(&draws[0].1[6..12], &[4, 5, 6, 5, 7, 6]);
    }

    #[test]
    fn texture_change_splits_draws() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let polys = vec![quad(1, 0.0), quad(2, 0.0), quad(1, 0.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Wait);

        assert_eq!(stats.draw_calls, 3);
        assert_eq!(backend.binds(), vec![TextureId(1), TextureId(2), TextureId(1)]);
        assert_eq!(backend.draw_textures(), vec![TextureId(1), TextureId(2), TextureId(1)]);
    }

    #[test]
    fn vertex_overflow_splits_same_texture() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(8, 1024);
        let polys = vec![quad(1, 0.0), quad(1, 20.0), quad(1, 40.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Wait);

        assert_eq!(stats.draw_calls, 2);
        assert_eq!(backend.binds(), vec![TextureId(1)]);
        let draws = backend.draws();
        assert_eq!(draws[0].0.len(), 8);
        assert_eq!(draws[1].1, &[0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn index_overflow_splits_same_texture() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 6);
        let polys = vec![quad(1, 0.0), quad(1, 20.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Wait);
        assert_eq!(stats.draw_calls, 2);
    }

    #[test]
    fn effect_passes_rebind_and_draw_each() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let effect = EffectId(9);

        let stats = packer.pack(&mut backend, &[quad(1, 0.0)], Some((effect, 2)), IncompleteTessellation::Wait);

        assert_eq!(stats.draw_calls, 2);
        let kinds: Vec<&str> = backend
            .calls
            .iter()
            .map(|c| match c {
                Call::ApplyState(..) => "state",
                Call::Bind(_) => "bind",
                Call::Pass(..) => "pass",
                Call::Draw { .. } => "draw",
            })
            .collect();
        assert_eq!(kinds, ["bind", "pass", "bind", "draw", "pass", "bind", "draw"]);
    }

    // ── unindexed polygons ────────────────────────────────────────────────

    fn pending_pentagon() -> Polygon {
        let texture = TextureHandle::new(TextureId(1), 16, 16);
        let v = |x: f32, y: f32| Vertex::new(Vec2::new(x, y), 0.0, Color::WHITE, Vec2::ZERO);
        Polygon::new(
            texture,
            0.0,
            vec![v(0.0, 0.0), v(4.0, 0.0), v(5.0, 3.0), v(2.0, 5.0), v(-1.0, 3.0)],
        )
        .unwrap()
    }

    #[test]
    fn wait_mode_skips_unindexed_and_keeps_going() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let polys = vec![quad(1, 0.0), pending_pentagon(), quad(1, 20.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Wait);

        assert_eq!(stats.polygons_drawn, 2);
        assert_eq!(stats.polygons_skipped, 1);
        assert_eq!(stats.polygons_truncated, 0);
        assert_eq!(stats.draw_calls, 1);
    }

    #[test]
    fn truncate_mode_drops_the_rest_of_the_batch() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let polys = vec![quad(1, 0.0), pending_pentagon(), quad(1, 20.0), quad(2, 0.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Truncate);

        assert_eq!(stats.polygons_drawn, 1);
        assert_eq!(stats.polygons_truncated, 3);
        assert_eq!(stats.polygons_skipped, 0);
        assert_eq!(stats.draw_calls, 1);
        let draws = backend.draws();
        assert_eq!(draws[0].0.len(), 4);
        assert_eq!(backend.binds(), vec![TextureId(1)]);
    }

    #[test]
    fn truncate_mode_with_leading_gap_draws_nothing() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let polys = vec![pending_pentagon(), quad(1, 0.0)];

        let stats = packer.pack(&mut backend, &polys, None, IncompleteTessellation::Truncate);

        assert_eq!(stats.polygons_truncated, 2);
        assert_eq!(stats.draw_calls, 0);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn empty_input_issues_nothing() {
        let mut backend = RecordingBackend::default();
        let mut packer = Packer::new(1024, 1024);
        let stats = packer.pack(&mut backend, &[], None, IncompleteTessellation::Wait);
        assert_eq!(stats, FlushStats::default());
        assert!(backend.calls.is_empty());
    }
}
