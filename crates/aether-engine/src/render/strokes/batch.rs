use std::ops::Range;

use aether_paint::{BaseMesh, DrawList, Primitive, Vertex};

use super::common::{InstanceRaw, MaterialUniform, SimpleVertex};

/// One draw call, referring into the packed arrays of a [`StrokeBatch`].
#[derive(Debug, Clone, PartialEq)]
pub(super) enum BatchItem {
    Lines { vertices: Range<u32>, material: u32 },
    Points { vertices: Range<u32>, material: u32 },
    Instanced { mesh: BaseMesh, instances: Range<u32>, material: u32 },
    Tube { indices: Range<u32>, material: u32 },
}

impl BatchItem {
    pub(super) fn material(&self) -> u32 {
        match self {
            BatchItem::Lines { material, .. }
            | BatchItem::Points { material, .. }
            | BatchItem::Instanced { material, .. }
            | BatchItem::Tube { material, .. } => *material,
        }
    }
}

/// CPU-side packing of a frame's draw list.
///
/// Every family gets one contiguous array, uploaded once per frame, and each
/// draw item records its range. Uploading per stroke into a shared buffer would
/// not work: all `write_buffer` calls land before the pass executes, so only
/// the last stroke's data would survive.
///
/// Cube and sphere instances are kept in separate arrays, each bound with its
/// own base mesh.
#[derive(Debug, Default)]
pub(super) struct StrokeBatch {
    pub simple: Vec<SimpleVertex>,
    pub cube_instances: Vec<InstanceRaw>,
    pub sphere_instances: Vec<InstanceRaw>,
    pub tube_vertices: Vec<Vertex>,
    /// Already offset into `tube_vertices`.
    pub tube_indices: Vec<u32>,
    pub materials: Vec<MaterialUniform>,
    /// Draw order: list order, so the preview stays last.
    pub items: Vec<BatchItem>,
}

impl StrokeBatch {
    pub(super) fn clear(&mut self) {
        self.simple.clear();
        self.cube_instances.clear();
        self.sphere_instances.clear();
        self.tube_vertices.clear();
        self.tube_indices.clear();
        self.materials.clear();
        self.items.clear();
    }

    pub(super) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Repacks the batch from `list`, reusing allocations.
    pub(super) fn build(&mut self, list: &DrawList<'_>) {
        self.clear();

        for cmd in list {
            if cmd.primitive.element_count() == 0 {
                continue;
            }
            let material = self.materials.len() as u32;

            let item = match &cmd.primitive {
                Primitive::LineStrip(points) | Primitive::Points(points) => {
                    let vertices = push_range(&mut self.simple, points.iter().map(|p| SimpleVertex {
                        position: p.to_array(),
                    }));
                    match cmd.primitive {
                        Primitive::LineStrip(_) => BatchItem::Lines { vertices, material },
                        _ => BatchItem::Points { vertices, material },
                    }
                }

                Primitive::Instanced { mesh, transforms } => {
                    let target = match mesh {
                        BaseMesh::Cube => &mut self.cube_instances,
                        BaseMesh::Sphere => &mut self.sphere_instances,
                    };
                    let instances = push_range(target, transforms.iter().map(InstanceRaw::from));
                    BatchItem::Instanced {
                        mesh: *mesh,
                        instances,
                        material,
                    }
                }

                Primitive::Mesh(mesh) => {
                    let base = self.tube_vertices.len() as u32;
                    self.tube_vertices.extend_from_slice(&mesh.vertices);
                    let indices =
                        push_range(&mut self.tube_indices, mesh.indices.iter().map(|i| i + base));
                    BatchItem::Tube { indices, material }
                }
            };

            self.materials.push(MaterialUniform::from(&cmd.material));
            self.items.push(item);
        }
    }

    pub(super) fn instances(&self, mesh: BaseMesh) -> &[InstanceRaw] {
        match mesh {
            BaseMesh::Cube => &self.cube_instances,
            BaseMesh::Sphere => &self.sphere_instances,
        }
    }

    /// Materials laid out at `stride`-byte offsets for dynamic uniform binding.
    pub(super) fn material_bytes(&self, stride: u64) -> Vec<u8> {
        let stride = stride as usize;
        let size = std::mem::size_of::<MaterialUniform>();
        debug_assert!(stride >= size);

        let mut bytes = vec![0u8; stride * self.materials.len()];
        for (i, m) in self.materials.iter().enumerate() {
            let at = i * stride;
            bytes[at..at + size].copy_from_slice(bytemuck::bytes_of(m));
        }
        bytes
    }
}

fn push_range<T>(dst: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> Range<u32> {
    let start = dst.len() as u32;
    dst.extend(items);
    start..dst.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_paint::{dispatch, StrokeStore, Style};
    use glam::{Vec3, Vec4};

    fn paint(store: &mut StrokeStore, style: Style, n: usize, x: f32) {
        store.set_style(style);
        for i in 0..n {
            store.add_point(Vec3::new(x, i as f32, 0.0));
        }
        store.end_stroke();
    }

    fn build(store: &StrokeStore) -> StrokeBatch {
        let mut batch = StrokeBatch::default();
        batch.build(&dispatch(store));
        batch
    }

    // ── packing ──────────────────────────────────────────────────────────

    #[test]
    fn empty_store_packs_nothing() {
        let batch = build(&StrokeStore::default());
        assert!(batch.is_empty());
        assert!(batch.materials.is_empty());
        assert!(batch.material_bytes(256).is_empty());
    }

    #[test]
    fn simple_strokes_share_one_array_with_disjoint_ranges() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Freehand, 3, 0.0);
        paint(&mut store, Style::Points, 4, 1.0);
        paint(&mut store, Style::Freehand, 2, 2.0);

        let batch = build(&store);
        assert_eq!(batch.simple.len(), 9);
        assert_eq!(
            batch.items,
            vec![
                BatchItem::Lines { vertices: 0..3, material: 0 },
                BatchItem::Points { vertices: 3..7, material: 1 },
                BatchItem::Lines { vertices: 7..9, material: 2 },
            ]
        );
        assert_eq!(batch.simple[3].position, store.strokes()[1].points()[0].to_array());
    }

    #[test]
    fn cube_and_sphere_instances_stay_separate() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Cube, 3, 0.0);
        paint(&mut store, Style::Sphere, 2, 1.0);
        paint(&mut store, Style::Cube, 2, 2.0);

        let batch = build(&store);
        assert_eq!(batch.instances(BaseMesh::Cube).len(), 5);
        assert_eq!(batch.instances(BaseMesh::Sphere).len(), 2);
        assert_eq!(
            batch.items,
            vec![
                BatchItem::Instanced { mesh: BaseMesh::Cube, instances: 0..3, material: 0 },
                BatchItem::Instanced { mesh: BaseMesh::Sphere, instances: 0..2, material: 1 },
                BatchItem::Instanced { mesh: BaseMesh::Cube, instances: 3..5, material: 2 },
            ]
        );
    }

    #[test]
    fn instance_matrix_places_point() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Sphere, 2, 4.0);

        let batch = build(&store);
        let model = batch.instances(BaseMesh::Sphere)[1].model;
        // Translation lives in the fourth column.
        assert_eq!(&model[3][..3], &[4.0, 1.0, 0.0]);
    }

    #[test]
    fn tube_indices_are_rebased() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Tube, 3, 0.0);
        paint(&mut store, Style::Tube, 4, 1.0);

        let first = store.strokes()[0].mesh().map(|m| m.vertices.len()).unwrap_or(0) as u32;
        let batch = build(&store);
        assert_eq!(batch.items.len(), 2);

        let BatchItem::Tube { indices, .. } = &batch.items[1] else {
            panic!("expected tube item");
        };
        let second = &batch.tube_indices[indices.start as usize..indices.end as usize];
        assert!(second.iter().all(|&i| i >= first));
        assert!(batch.tube_indices.iter().all(|&i| (i as usize) < batch.tube_vertices.len()));
    }

    // ── ordering + materials ─────────────────────────────────────────────

    #[test]
    fn preview_is_last_and_uses_live_material() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Tube, 3, 0.0);

        store.set_style(Style::Cube);
        store.brush_mut().set_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        store.add_point(Vec3::ZERO);
        store.add_point(Vec3::X);

        let batch = build(&store);
        assert_eq!(batch.items.len(), 2);
        assert_eq!(
            batch.items[1],
            BatchItem::Instanced { mesh: BaseMesh::Cube, instances: 0..1, material: 1 }
        );
        assert_eq!(batch.materials[1].diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(batch.items[1].material(), 1);
    }

    #[test]
    fn material_bytes_respect_stride() {
        let mut store = StrokeStore::default();
        store.brush_mut().set_color(Vec4::new(0.0, 1.0, 0.0, 1.0));
        paint(&mut store, Style::Freehand, 2, 0.0);
        store.brush_mut().set_color(Vec4::new(0.0, 0.0, 1.0, 1.0));
        paint(&mut store, Style::Points, 2, 1.0);

        let batch = build(&store);
        let bytes = batch.material_bytes(256);
        assert_eq!(bytes.len(), 512);

        let second: MaterialUniform = bytemuck::pod_read_unaligned(&bytes[256..256 + 64]);
        assert_eq!(second.diffuse, [0.0, 0.0, 1.0, 1.0]);
        assert!(bytes[64..256].iter().all(|&b| b == 0));
    }

    #[test]
    fn rebuild_reuses_and_resets() {
        let mut store = StrokeStore::default();
        paint(&mut store, Style::Freehand, 5, 0.0);

        let mut batch = StrokeBatch::default();
        batch.build(&dispatch(&store));
        store.undo();
        batch.build(&dispatch(&store));
        assert!(batch.is_empty());
        assert!(batch.simple.is_empty());
    }
}
