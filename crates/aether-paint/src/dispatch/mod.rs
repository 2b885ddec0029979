//! Style dispatch.
//!
//! Maps each stroke's style to a rendering strategy and records the result as
//! a [`DrawList`]:
//!
//! | style    | primitive                            | model transform            |
//! |----------|--------------------------------------|----------------------------|
//! | Freehand | line strip through the points        | identity                   |
//! | Points   | one point per control point          | identity                   |
//! | Cube     | instanced unit cube per point        | translate + uniform scale  |
//! | Sphere   | instanced unit sphere per point      | translate + uniform scale  |
//! | Tube     | indexed mesh from the derived data   | identity                   |
//!
//! The open stroke is appended last as a preview. Its style and size are the
//! ones frozen when it opened, so the preview matches what `end_stroke` will
//! commit; only the material follows the live brush. For instanced styles the
//! preview is a single instance at the newest point.

mod cmd;
mod list;

use std::borrow::Cow;

use glam::{Mat4, Vec3};

pub use cmd::{BaseMesh, DrawCmd, Primitive};
pub use list::DrawList;

use crate::geometry::GeometrySettings;
use crate::store::StrokeStore;
use crate::stroke::{Point, Stroke};
use crate::style::Style;

/// Records draw commands for every committed stroke, then the preview.
///
/// Strokes with nothing to draw (e.g. an empty mesh) are skipped.
pub fn dispatch(store: &StrokeStore) -> DrawList<'_> {
    let settings = store.settings();
    let mut list = DrawList::with_capacity(store.stroke_count() + 1);

    for stroke in store.strokes() {
        if let Some(primitive) = stroke_primitive(stroke, settings) {
            list.push(DrawCmd {
                primitive,
                material: stroke.material(),
                preview: false,
            });
        }
    }

    if let Some(current) = store.current() {
        if let Some(primitive) = preview_primitive(current, settings) {
            list.push(DrawCmd {
                primitive,
                material: store.brush().material,
                preview: true,
            });
        }
    }

    list
}

/// Model matrix for one instanced base mesh: translate to `point`, scale by `scale`.
#[inline]
pub fn instance_transform(point: Point, scale: f32) -> Mat4 {
    Mat4::from_translation(point) * Mat4::from_scale(Vec3::splat(scale))
}

fn base_mesh(style: Style) -> Option<BaseMesh> {
    match style {
        Style::Cube => Some(BaseMesh::Cube),
        Style::Sphere => Some(BaseMesh::Sphere),
        _ => None,
    }
}

fn stroke_primitive<'a>(stroke: &'a Stroke, settings: &GeometrySettings) -> Option<Primitive<'a>> {
    let points = stroke.points();
    match stroke.style() {
        Style::Freehand => (points.len() >= 2).then_some(Primitive::LineStrip(points)),
        Style::Points => (!points.is_empty()).then_some(Primitive::Points(points)),
        style @ (Style::Cube | Style::Sphere) => {
            let scale = settings.instance_size(stroke.size());
            let transforms: Vec<Mat4> =
                points.iter().map(|&p| instance_transform(p, scale)).collect();
            instanced(style, transforms)
        }
        Style::Tube => {
            let mesh = match stroke.mesh() {
                Some(mesh) => Cow::Borrowed(mesh),
                None => {
                    log::warn!("tube stroke without derived mesh; generating on the fly");
                    Cow::Owned(settings.tube_for(points, stroke.size()))
                }
            };
            (!mesh.is_empty()).then_some(Primitive::Mesh(mesh))
        }
    }
}

fn preview_primitive<'a>(stroke: &'a Stroke, settings: &GeometrySettings) -> Option<Primitive<'a>> {
    let points = stroke.points();
    match stroke.style() {
        Style::Freehand => (points.len() >= 2).then_some(Primitive::LineStrip(points)),
        Style::Points => (!points.is_empty()).then_some(Primitive::Points(points)),
        style @ (Style::Cube | Style::Sphere) => {
            let last = points.last()?;
            instanced(style, vec![instance_transform(*last, settings.instance_size(stroke.size()))])
        }
        Style::Tube => {
            let mesh = settings.tube_for(points, stroke.size());
            (!mesh.is_empty()).then(|| Primitive::Mesh(Cow::Owned(mesh)))
        }
    }
}

fn instanced<'a>(style: Style, transforms: Vec<Mat4>) -> Option<Primitive<'a>> {
    let mesh = base_mesh(style)?;
    (!transforms.is_empty()).then_some(Primitive::Instanced { mesh, transforms })
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn store_with(style: Style, strokes: &[usize]) -> StrokeStore {
        let mut store = StrokeStore::default();
        store.set_style(style);
        for &n in strokes {
            for i in 0..n {
                store.add_point(Vec3::new(i as f32, 0.0, 0.0));
            }
            store.end_stroke();
        }
        store
    }

    #[test]
    fn empty_store_dispatches_nothing() {
        assert!(dispatch(&StrokeStore::default()).is_empty());
    }

    #[test]
    fn one_command_per_committed_stroke_in_order() {
        let mut store = store_with(Style::Freehand, &[2, 3]);
        store.set_style(Style::Points);
        store.add_point(Vec3::ZERO);
        store.add_point(Vec3::X);
        store.add_point(Vec3::Y);
        store.add_point(Vec3::Z);
        store.end_stroke();

        let list = dispatch(&store);
        let counts: Vec<usize> = list.iter().map(|c| c.primitive.element_count()).collect();
        assert_eq!(counts, vec![2, 3, 4]);
        assert!(matches!(list.items()[2].primitive, Primitive::Points(_)));
    }

    #[test]
    fn freehand_is_line_strip_through_points() {
        let store = store_with(Style::Freehand, &[3]);
        let list = dispatch(&store);
        let Primitive::LineStrip(points) = &list.items()[0].primitive else {
            panic!("expected line strip");
        };
        assert_eq!(*points, store.strokes()[0].points());
    }

    #[test]
    fn instanced_styles_emit_one_transform_per_point() {
        for (style, mesh) in [(Style::Cube, BaseMesh::Cube), (Style::Sphere, BaseMesh::Sphere)] {
            let store = store_with(style, &[4]);
            let list = dispatch(&store);
            let Primitive::Instanced { mesh: m, transforms } = &list.items()[0].primitive else {
                panic!("expected instanced primitive");
            };
            assert_eq!(*m, mesh);
            assert_eq!(transforms.len(), 4);

            let stroke = &store.strokes()[0];
            let scale = store.settings().instance_size(stroke.size());
            for (t, p) in transforms.iter().zip(stroke.points()) {
                assert!(t.w_axis.truncate().abs_diff_eq(*p, 1e-6));
                assert!((t.x_axis.x - scale).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn tube_borrows_committed_mesh() {
        let store = store_with(Style::Tube, &[3]);
        let list = dispatch(&store);
        let Primitive::Mesh(mesh) = &list.items()[0].primitive else {
            panic!("expected mesh primitive");
        };
        assert!(matches!(mesh, Cow::Borrowed(_)));
        assert_eq!(Some(&**mesh), store.strokes()[0].mesh());
    }

    #[test]
    fn committed_strokes_keep_frozen_style_and_material() {
        let mut store = store_with(Style::Cube, &[2]);
        store.set_style(Style::Freehand);
        store.brush_mut().set_color(Vec4::new(1.0, 0.0, 0.0, 1.0));

        let list = dispatch(&store);
        assert!(matches!(list.items()[0].primitive, Primitive::Instanced { .. }));
        assert_eq!(list.items()[0].material, store.strokes()[0].material());
        assert!(!list.items()[0].preview);
    }

    // ── preview ───────────────────────────────────────────────────────────

    #[test]
    fn preview_is_last_and_uses_live_brush() {
        let mut store = store_with(Style::Freehand, &[2]);
        store.add_point(Vec3::ZERO);
        store.add_point(Vec3::ONE);
        store.brush_mut().set_color(Vec4::new(0.0, 1.0, 0.0, 1.0));

        let list = dispatch(&store);
        assert_eq!(list.len(), 2);
        let preview = &list.items()[1];
        assert!(preview.preview);
        assert_eq!(preview.material, store.brush().material);
    }

    #[test]
    fn instanced_preview_draws_single_instance_at_newest_point() {
        let mut store = StrokeStore::default();
        store.set_style(Style::Sphere);
        for i in 0..5 {
            store.add_point(Vec3::new(i as f32, 1.0, 0.0));
        }

        let list = dispatch(&store);
        let Primitive::Instanced { transforms, .. } = &list.items()[0].primitive else {
            panic!("expected instanced preview");
        };
        assert_eq!(transforms.len(), 1);
        assert!(transforms[0].w_axis.truncate().abs_diff_eq(Vec3::new(4.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn tube_preview_follows_live_points() {
        let mut store = StrokeStore::default();
        store.set_style(Style::Tube);
        store.add_point(Vec3::ZERO);
        assert!(dispatch(&store).is_empty());

        store.add_point(Vec3::X);
        store.add_point(Vec3::new(2.0, 0.0, 0.0));
        store.remove_last_point();

        let list = dispatch(&store);
        let Primitive::Mesh(mesh) = &list.items()[0].primitive else {
            panic!("expected mesh preview");
        };
        assert_eq!(mesh.vertex_count(), 2 * store.settings().ring_segments as usize);
    }

    #[test]
    fn preview_keeps_style_and_size_frozen_at_open() {
        let mut store = StrokeStore::default();
        store.add_point(Vec3::ZERO);
        store.add_point(Vec3::X);
        store.set_style(Style::Tube);
        store.brush_mut().set_size(9.0);

        let preview = dispatch(&store).items()[0].primitive.clone();
        assert!(matches!(preview, Primitive::LineStrip(points) if points.len() == 2));

        assert!(store.end_stroke());
        let committed = &store.strokes()[0];
        assert_eq!(committed.style(), Style::Freehand);
        assert!(matches!(dispatch(&store).items()[0].primitive, Primitive::LineStrip(_)));
    }

    #[test]
    fn instanced_preview_scales_with_frozen_size() {
        let mut store = StrokeStore::default();
        store.set_style(Style::Cube);
        store.add_point(Vec3::ZERO);
        let frozen = store.current().map(|s| s.size()).unwrap_or_default();
        store.brush_mut().set_size(9.0);

        let list = dispatch(&store);
        let Primitive::Instanced { transforms, .. } = &list.items()[0].primitive else {
            panic!("expected instanced preview");
        };
        let scale = store.settings().instance_size(frozen);
        assert!((transforms[0].x_axis.x - scale).abs() < 1e-6);
    }

    #[test]
    fn single_point_freehand_preview_is_skipped() {
        let mut store = StrokeStore::default();
        store.add_point(Vec3::ZERO);
        assert!(dispatch(&store).is_empty());
    }

    #[test]
    fn instance_transform_translates_then_scales() {
        let m = instance_transform(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let corner = m.transform_point3(Vec3::splat(0.5));
        assert!(corner.abs_diff_eq(Vec3::new(1.25, 2.25, 3.25), 1e-6));
    }
}
