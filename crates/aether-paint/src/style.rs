use std::fmt;

/// Rendering strategy of a stroke.
///
/// A stroke's style is captured when it opens and never follows later changes
/// to the brush.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Style {
    /// Connected line strip through the control points.
    #[default]
    Freehand,
    /// One point primitive per control point.
    Points,
    /// One instanced unit cube per control point.
    Cube,
    /// One instanced unit sphere per control point.
    Sphere,
    /// Extruded tube mesh around the control points.
    Tube,
}

impl Style {
    /// All styles in selection order.
    pub const ALL: [Style; 5] = [
        Style::Freehand,
        Style::Points,
        Style::Cube,
        Style::Sphere,
        Style::Tube,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Style::Freehand => "Freehand",
            Style::Points => "Points",
            Style::Cube => "Cube",
            Style::Sphere => "Sphere",
            Style::Tube => "Tube",
        }
    }

    /// True for styles whose strokes carry derived mesh data.
    #[inline]
    pub fn needs_mesh(self) -> bool {
        matches!(self, Style::Tube)
    }

    /// True for styles drawn as one base-mesh instance per control point.
    #[inline]
    pub fn is_instanced(self) -> bool {
        matches!(self, Style::Cube | Style::Sphere)
    }

    /// Next style in [`Style::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_all() {
        let mut s = Style::Freehand;
        for expected in Style::ALL.iter().skip(1) {
            s = s.next();
            assert_eq!(s, *expected);
        }
        assert_eq!(s.next(), Style::Freehand);
    }

    #[test]
    fn only_tube_needs_mesh() {
        let meshed: Vec<_> = Style::ALL.into_iter().filter(|s| s.needs_mesh()).collect();
        assert_eq!(meshed, vec![Style::Tube]);
    }

    #[test]
    fn instanced_styles() {
        assert!(Style::Cube.is_instanced());
        assert!(Style::Sphere.is_instanced());
        assert!(!Style::Points.is_instanced());
    }
}
