//! Re-triangulation of polygon outlines.
//!
//! The outline is fed to lyon as one closed contour and filled with the
//! even-odd rule. The output must reuse the input vertices exactly; anything
//! else (self-intersections, degenerate points) is a [`GeometryError`].
//!
//! Triangles are emitted with the winding of [`QUAD_INDICES`](super::QUAD_INDICES)
//! (positive signed area with +Y down), whichever way the outline runs.

use lyon::math::{point, Point};
use lyon::path::polygon::Polygon as Contour;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

use super::error::GeometryError;
use super::polygon::Vertex;

/// Reusable tessellation state. Owned by one triangulation at a time.
pub struct TessellatorContext {
    tessellator: FillTessellator,
    options: FillOptions,
    contour: Vec<Point>,
    output: VertexBuffers<Point, u16>,
    remap: Vec<Option<u16>>,
}

impl Default for TessellatorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TessellatorContext {
    pub fn new() -> Self {
        Self {
            tessellator: FillTessellator::new(),
            options: FillOptions::default().with_fill_rule(FillRule::EvenOdd),
            contour: Vec::new(),
            output: VertexBuffers::new(),
            remap: Vec::new(),
        }
    }

    /// Triangulates `vertices` (one closed outline) into indices of `vertices`.
    pub fn triangulate(&mut self, vertices: &[Vertex]) -> Result<Vec<u16>, GeometryError> {
        self.contour.clear();
        self.contour
            .extend(vertices.iter().map(|v| point(v.position[0], v.position[1])));

        self.output.vertices.clear();
        self.output.indices.clear();

        let contour = Contour { points: &self.contour, closed: true };
        self.tessellator
            .tessellate_polygon(
                contour,
                &self.options,
                &mut BuffersBuilder::new(&mut self.output, |v: FillVertex| v.position()),
            )
            .map_err(|err| GeometryError::Tessellation(format!("{err:?}")))?;

        if self.output.vertices.len() != vertices.len() {
            return Err(GeometryError::VertexCountMismatch {
                expected: vertices.len(),
                produced: self.output.vertices.len(),
            });
        }

        self.remap.clear();
        self.remap.resize(vertices.len(), None);

        let mut indices = Vec::with_capacity(self.output.indices.len());
        for &local in &self.output.indices {
            let slot = &mut self.remap[local as usize];
            let resolved = match *slot {
                Some(idx) => idx,
                None => {
                    let p = self.output.vertices[local as usize];
                    let idx = vertices
                        .iter()
                        .position(|v| v.position[0] == p.x && v.position[1] == p.y)
                        .ok_or(GeometryError::UnresolvedVertex { x: p.x, y: p.y })?;
                    // Vertex count is bounded by the u16 range at polygon construction.
                    let idx = idx as u16;
                    *slot = Some(idx);
                    idx
                }
            };
            indices.push(resolved);
        }

        for tri in indices.chunks_exact_mut(3) {
            if signed_area(vertices, tri) < 0.0 {
                tri.swap(1, 2);
            }
        }

        Ok(indices)
    }
}

/// Twice the signed area of triangle `tri`, positive when clockwise on a
/// +Y-down screen.
fn signed_area(vertices: &[Vertex], tri: &[u16]) -> f32 {
    let a = vertices[tri[0] as usize].xy();
    let b = vertices[tri[1] as usize].xy();
    let c = vertices[tri[2] as usize].xy();
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}
