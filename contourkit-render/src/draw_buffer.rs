//! Per-frame drawing output handed to the rendering backend

use crate::drawer::DrawerKind;
use bytemuck::{Pod, Zeroable};
use contourkit_algorithms::LineSegment;
use contourkit_core::{with_alpha, Point3f, Rgb, Rgba, Vector3f};
use serde::{Deserialize, Serialize};

/// One endpoint of a line, laid out for direct upload as a vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Vertex of the shaded base mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    pub fn new(position: &Point3f, normal: &Vector3f, color: Rgba) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            normal: [normal.x, normal.y, normal.z],
            color,
        }
    }
}

/// Color and width of the lines a drawer emits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f32,
}

impl LineStyle {
    pub fn new(color: Rgb, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0],
            width: 2.0,
        }
    }
}

/// Lines of one drawer for one frame, two vertices per segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBatch {
    pub vertices: Vec<LineVertex>,
    pub style: LineStyle,
}

impl LineBatch {
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw bytes of the vertex data
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Indexed triangles of the shaded base mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBatch {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl TriangleBatch {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// What a drawer hands over when flushed
#[derive(Debug, Clone, PartialEq)]
pub enum DrawBatch {
    Lines(LineBatch),
    Triangles(TriangleBatch),
}

impl DrawBatch {
    pub fn is_empty(&self) -> bool {
        match self {
            DrawBatch::Lines(lines) => lines.is_empty(),
            DrawBatch::Triangles(tris) => tris.indices.is_empty(),
        }
    }

    pub fn as_lines(&self) -> Option<&LineBatch> {
        match self {
            DrawBatch::Lines(lines) => Some(lines),
            DrawBatch::Triangles(_) => None,
        }
    }

    pub fn as_triangles(&self) -> Option<&TriangleBatch> {
        match self {
            DrawBatch::Triangles(tris) => Some(tris),
            DrawBatch::Lines(_) => None,
        }
    }
}

/// Everything one model produced in one frame, in drawer stack order
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: Point3f,
    pub batches: Vec<(DrawerKind, DrawBatch)>,
}

impl Frame {
    pub fn new(camera: Point3f) -> Self {
        Self {
            camera,
            batches: Vec::new(),
        }
    }

    pub fn batch(&self, kind: DrawerKind) -> Option<&DrawBatch> {
        self.batches.iter().find(|(k, _)| *k == kind).map(|(_, b)| b)
    }

    /// Total number of line segments across all batches
    pub fn segment_count(&self) -> usize {
        self.batches
            .iter()
            .filter_map(|(_, b)| b.as_lines())
            .map(LineBatch::segment_count)
            .sum()
    }
}

/// Accumulates line endpoints and colors during a frame.
///
/// Flushing moves the contents into a [`LineBatch`] and leaves the buffer
/// empty, ready for the next frame.
#[derive(Debug, Clone, Default)]
pub struct DrawBuffer {
    vertices: Vec<LineVertex>,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, taking each endpoint's alpha from the segment
    pub fn push_segment(&mut self, segment: &LineSegment, color: Rgb) {
        for (p, alpha) in segment.endpoints.iter().zip(segment.alphas) {
            self.vertices.push(LineVertex {
                position: [p.x, p.y, p.z],
                color: with_alpha(color, alpha),
            });
        }
    }

    pub fn extend<'a, I>(&mut self, segments: I, color: Rgb)
    where
        I: IntoIterator<Item = &'a LineSegment>,
    {
        for segment in segments {
            self.push_segment(segment, color);
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn flush(&mut self, style: LineStyle) -> LineBatch {
        LineBatch {
            vertices: std::mem::take(&mut self.vertices),
            style,
        }
    }
}
