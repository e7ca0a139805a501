//! Retained-mode render target.
//!
//! A [`Scene`] holds shapes in data coordinates. Adding a shape returns a
//! stable [`ShapeId`] so the owner can later remove exactly that shape;
//! shapes are rasterized in insertion order. Axis limits, tick labels and
//! the caption live on the scene as well, mirroring what a plotting axes
//! object would carry.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Color;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a shape previously added to a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u64);

/// Region a [`Shape::ClippedRect`] is confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clip {
    Circle { cx: f64, cy: f64, radius: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
}

/// Horizontal anchoring of a text shape; vertically always centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    LeftCenter,
    RightCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    /// Axis-aligned rectangle; `height` may be negative, which the
    /// rasterizer normalizes to the equivalent upward rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// Rectangle drawn only where it overlaps `clip`.
    ClippedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        clip: Clip,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f32,
        color: Color,
        anchor: Anchor,
    },
}

/// Data-coordinate extents of a scene viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Axis tick with a preformatted label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug)]
pub struct Scene {
    id: u64,
    next_shape: u64,
    shapes: Vec<(ShapeId, Shape)>,
    limits: Option<AxisLimits>,
    ticks: Vec<Tick>,
    caption: Option<String>,
    open: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            next_shape: 0,
            shapes: Vec::new(),
            limits: None,
            ticks: Vec::new(),
            caption: None,
            open: true,
        }
    }

    /// Identity of this surface; gauges bind to it on first draw.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Invalidate the surface. Gauges bound to it fail their next update.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.shapes.push((id, shape));
        id
    }

    /// Remove a shape by handle. Returns whether it was present.
    pub fn remove(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|(sid, _)| *sid != id);
        self.shapes.len() != before
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|(sid, _)| *sid == id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shapes in z-order (insertion order).
    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (id, shape))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, shape)| shape)
    }

    pub fn set_limits(&mut self, limits: AxisLimits) {
        self.limits = Some(limits);
    }

    pub fn limits(&self) -> Option<AxisLimits> {
        self.limits
    }

    pub fn set_ticks(&mut self, ticks: Vec<Tick>) {
        self.ticks = ticks;
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn set_caption(&mut self, caption: String) {
        self.caption = Some(caption);
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_rect(color: Color) -> Shape {
        Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            color,
        }
    }

    #[test]
    fn scene_ids_are_unique() {
        assert_ne!(Scene::new().id(), Scene::new().id());
    }

    #[test]
    fn add_and_remove_by_handle() {
        let mut scene = Scene::new();
        let a = scene.add(probe_rect(Color::RED));
        let b = scene.add(probe_rect(Color::BLUE));
        assert_eq!(scene.shape_count(), 2);
        assert!(scene.remove(a));
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        // Removing again is a no-op.
        assert!(!scene.remove(a));
        assert_eq!(scene.shape_count(), 1);
    }

    #[test]
    fn shapes_keep_insertion_order_across_removal() {
        let mut scene = Scene::new();
        let _a = scene.add(probe_rect(Color::RED));
        let b = scene.add(probe_rect(Color::BLUE));
        let c = scene.add(probe_rect(Color::BLACK));
        scene.remove(b);
        let colors: Vec<_> = scene
            .shapes()
            .map(|(_, s)| match s {
                Shape::Rect { color, .. } => *color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, [Color::RED, Color::BLACK]);
    }

    #[test]
    fn close_marks_the_scene_unavailable() {
        let mut scene = Scene::new();
        assert!(scene.is_open());
        scene.close();
        assert!(!scene.is_open());
    }
}
