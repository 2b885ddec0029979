use glam::Vec3;

use crate::brush::Brush;
use crate::geometry::{smooth, GeometrySettings, Mesh};
use crate::material::Material;
use crate::style::Style;

/// World-space control point.
pub type Point = Vec3;

/// One paint gesture: control points plus the appearance frozen when it opened.
///
/// Control points are only reachable read-only from outside the crate; every
/// edit goes through the store, which replaces the whole sequence.
/// `mesh` is present only on committed strokes whose style needs one.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    style: Style,
    material: Material,
    size: f32,
    mesh: Option<Mesh>,
}

impl Stroke {
    /// Opens an empty stroke, snapshotting `brush`.
    pub fn open(brush: &Brush) -> Self {
        Self::with_points(brush, Vec::new())
    }

    /// Builds a stroke from existing points, snapshotting `brush`.
    pub fn with_points(brush: &Brush, points: Vec<Point>) -> Self {
        Self {
            points,
            style: brush.style,
            material: brush.material,
            size: brush.size,
            mesh: None,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Derived tube geometry, if generated.
    #[inline]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Mean of the control points, `None` when empty.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().copied().sum::<Vec3>() / self.points.len() as f32)
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn pop(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Replaces the control points with `f` applied to each of them.
    pub(crate) fn map_points(&mut self, f: impl FnMut(Point) -> Point) {
        let points = self.points.iter().copied().map(f).collect();
        self.set_points(points);
    }

    pub(crate) fn reverse(&mut self) {
        let points = self.points.iter().rev().copied().collect();
        self.set_points(points);
    }

    pub(crate) fn smooth(&mut self, settings: &GeometrySettings) {
        let points = smooth(&self.points, settings.smoothing);
        self.set_points(points);
    }

    /// Prepares a closing stroke for the store: optional smoothing, then mesh generation.
    pub(crate) fn finalize(&mut self, settings: &GeometrySettings) {
        if settings.smooth_on_commit {
            self.smooth(settings);
        }
        self.regenerate_mesh(settings);
    }

    /// Rebuilds derived geometry from the current points.
    pub(crate) fn regenerate_mesh(&mut self, settings: &GeometrySettings) {
        self.mesh = self
            .style
            .needs_mesh()
            .then(|| settings.tube_for(&self.points, self.size));
    }

    fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        // Derived data no longer matches; committed strokes regenerate explicitly.
        self.mesh = None;
    }
}
