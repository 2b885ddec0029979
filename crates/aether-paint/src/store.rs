//! Stroke store: committed strokes, the open stroke and the redo buffer.
//!
//! Invariants:
//! - at most one stroke is open
//! - committed strokes have at least two points and are kept in commit order,
//!   which is both draw order and undo order
//! - any structural append (commit, duplicate, merge) empties the redo buffer,
//!   so `redo` always restores the exact order `undo` left behind
//!
//! Nothing here fails: operations that do not apply are no-ops.

use glam::Vec3;

use crate::brush::Brush;
use crate::geometry::GeometrySettings;
use crate::stroke::{Point, Stroke};
use crate::style::Style;

/// Minimum number of points for a stroke to be committed.
pub const MIN_STROKE_POINTS: usize = 2;

/// Single-threaded stroke collection driven once per frame.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    brush: Brush,
    settings: GeometrySettings,

    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    redo: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new(settings: GeometrySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── brush ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Mutable access to the live brush. Existing strokes are unaffected.
    #[inline]
    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    #[inline]
    pub fn set_style(&mut self, style: Style) {
        self.brush.set_style(style);
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.brush.style
    }

    #[inline]
    pub fn settings(&self) -> &GeometrySettings {
        &self.settings
    }

    // ── queries ────────────────────────────────────────────────────────────

    /// Committed strokes in commit order.
    #[inline]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke being drawn, if any.
    #[inline]
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Number of committed strokes. The open stroke is not counted.
    #[inline]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    #[inline]
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// Appends `point` to the open stroke, opening one from the current brush if needed.
    pub fn add_point(&mut self, point: Point) {
        let brush = self.brush;
        self.current
            .get_or_insert_with(|| {
                log::debug!("stroke opened ({} size {})", brush.style, brush.size);
                Stroke::open(&brush)
            })
            .push(point);
    }

    /// Closes the open stroke.
    ///
    /// Strokes shorter than [`MIN_STROKE_POINTS`] are discarded. Otherwise the
    /// stroke is smoothed/meshed per the geometry settings, committed, and the
    /// redo buffer is cleared. Returns `true` when a stroke was committed.
    pub fn end_stroke(&mut self) -> bool {
        let Some(mut stroke) = self.current.take() else {
            return false;
        };

        if stroke.len() < MIN_STROKE_POINTS {
            log::debug!("stroke discarded ({} points)", stroke.len());
            return false;
        }

        stroke.finalize(&self.settings);
        log::debug!("stroke committed ({} points, {})", stroke.len(), stroke.style());
        self.commit(stroke);
        true
    }

    // ── history ────────────────────────────────────────────────────────────

    /// Moves the last committed stroke into the redo buffer.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.strokes.pop() else {
            return false;
        };
        self.redo.push(stroke);
        log::debug!("undo ({} strokes, {} redoable)", self.strokes.len(), self.redo.len());
        true
    }

    /// Re-appends the most recently undone stroke.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo.pop() else {
            return false;
        };
        self.strokes.push(stroke);
        log::debug!("redo ({} strokes, {} redoable)", self.strokes.len(), self.redo.len());
        true
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Drops everything: committed strokes, the open stroke and the redo buffer.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.redo.clear();
        log::debug!("store cleared");
    }

    // ── open-stroke edits ──────────────────────────────────────────────────

    /// Smooths the open stroke in place (needs at least three points).
    pub fn smooth_current(&mut self) {
        let settings = self.settings;
        if let Some(stroke) = self.current.as_mut().filter(|s| s.len() > 2) {
            stroke.smooth(&settings);
        }
    }

    pub fn remove_last_point(&mut self) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.pop();
        }
    }

    /// Scales the open stroke about its centroid.
    pub fn scale_current(&mut self, factor: f32) {
        let Some(stroke) = self.current.as_mut() else { return };
        let Some(center) = stroke.centroid() else { return };
        stroke.map_points(|p| center + (p - center) * factor);
    }

    pub fn translate_current(&mut self, offset: Vec3) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.map_points(|p| p + offset);
        }
    }

    pub fn reverse_current(&mut self) {
        if let Some(stroke) = self.current.as_mut().filter(|s| s.len() > 1) {
            stroke.reverse();
        }
    }

    // ── structural edits ───────────────────────────────────────────────────

    /// Appends an independent copy of the last committed stroke.
    pub fn duplicate_last(&mut self) -> bool {
        let Some(copy) = self.strokes.last().cloned() else {
            return false;
        };
        self.commit(copy);
        true
    }

    /// Replaces all committed strokes with one stroke holding all their points.
    ///
    /// The merged stroke takes the live brush appearance, not any source
    /// stroke's. Needs at least two committed strokes; the open stroke is left
    /// alone.
    pub fn merge_all(&mut self) -> bool {
        if self.strokes.len() < 2 {
            return false;
        }

        let points: Vec<Point> = self
            .strokes
            .drain(..)
            .flat_map(|s| s.points().to_vec())
            .collect();

        let mut merged = Stroke::with_points(&self.brush, points);
        merged.regenerate_mesh(&self.settings);
        log::debug!("merged strokes into one ({} points)", merged.len());
        self.commit(merged);
        true
    }

    fn commit(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
        self.redo.clear();
    }
}
