use glam::Mat4;

use super::{Material, NodeId, NodeKind, Scene, SphereGeometry};

/// One mesh to draw, resolved to world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Mat4,
    pub geometry: SphereGeometry,
    pub material: Material,
}

/// Flattened draw stream for a frame.
///
/// Rebuilt from the scene graph each frame; keeps its allocation between
/// frames.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with every mesh in `scene`, in traversal order.
    pub fn rebuild(&mut self, scene: &Scene) {
        self.items.clear();
        scene.walk(|node, n, world| {
            if let NodeKind::Mesh(mesh) = &n.kind {
                self.items.push(DrawItem {
                    node,
                    world,
                    geometry: mesh.geometry,
                    material: mesh.material,
                });
            }
        });
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::{BasicMaterial, Mesh, Node};

    fn ball(radius: f32) -> Node {
        Node::mesh(
            "ball",
            Mesh {
                geometry: SphereGeometry::new(radius, 8, 8),
                material: BasicMaterial { color: Color::WHITE }.into(),
            },
        )
    }

    #[test]
    fn groups_are_skipped() {
        let mut scene = Scene::default();
        let g = scene.add(Node::group("g"));
        scene.add_child(g, ball(1.0));
        scene.add_child(g, ball(0.5));

        let mut list = DrawList::new();
        list.rebuild(&scene);
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[1].geometry.radius, 0.5);
    }

    #[test]
    fn rebuild_replaces_previous_items() {
        let mut scene = Scene::default();
        scene.add(ball(1.0));
        let mut list = DrawList::new();
        list.rebuild(&scene);
        list.rebuild(&scene);
        assert_eq!(list.len(), 1);
    }
}
