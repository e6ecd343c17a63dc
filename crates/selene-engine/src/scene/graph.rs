use glam::Mat4;

use crate::paint::Color;

use super::{AmbientLight, DirectionalLight, Mesh, Transform};

/// Handle to a node stored in a [`Scene`].
///
/// Handles are only meaningful for the scene that issued them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Transform-only node used to group children.
    Group,
    Mesh(Mesh),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group(name: &'static str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: &'static str, mesh: Mesh) -> Self {
        Self::new(name, NodeKind::Mesh(mesh))
    }

    fn new(name: &'static str, kind: NodeKind) -> Self {
        Self {
            name,
            transform: Transform::IDENTITY,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Scene graph: an arena of nodes plus global lighting and background.
///
/// Nodes are never removed; a child stays attached to its parent for the
/// lifetime of the scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub ambient: Option<AmbientLight>,
    pub directional: Vec<DirectionalLight>,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            ambient: None,
            directional: Vec::new(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Adds a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.push(node, None);
        self.roots.push(id);
        id
    }

    /// Adds `node` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not belong to this scene.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = self.push(node, Some(parent));
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    fn push(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes below `id`, at any depth.
    pub fn descendant_count(&self, id: NodeId) -> usize {
        self.node(id).map_or(0, |n| {
            n.children
                .iter()
                .map(|c| 1 + self.descendant_count(*c))
                .sum()
        })
    }

    /// Local-to-world matrix of `id` (parent chain composed root-first).
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.node(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(p) => Some(self.world_matrix(p)? * local),
            None => Some(local),
        }
    }

    /// Depth-first traversal from every root, parents before children.
    ///
    /// `visit` receives each node with its world matrix.
    pub fn walk(&self, mut visit: impl FnMut(NodeId, &Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            let world = parent_world * node.transform.matrix();
            visit(id, node, world);
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BasicMaterial, Euler, SphereGeometry};
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn ball() -> Node {
        Node::mesh(
            "ball",
            Mesh {
                geometry: SphereGeometry::new(1.0, 8, 8),
                material: BasicMaterial { color: Color::WHITE }.into(),
            },
        )
    }

    #[test]
    fn children_inherit_parent_rotation() {
        let mut scene = Scene::default();
        let parent = scene.add(Node::group("parent"));
        let child = scene
            .add_child(parent, ball().with_transform(Transform::from_position(Vec3::X)))
            .unwrap();

        scene.node_mut(parent).unwrap().transform.rotation = Euler::new(0.0, FRAC_PI_2, 0.0);

        let p = scene.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::NEG_Z).length() < 1e-5, "{p:?}");
    }

    #[test]
    fn walk_visits_parents_before_children() {
        let mut scene = Scene::default();
        let a = scene.add(Node::group("a"));
        let b = scene.add_child(a, Node::group("b")).unwrap();
        let c = scene.add_child(b, ball()).unwrap();
        let d = scene.add(ball());

        let mut order = Vec::new();
        scene.walk(|id, _, _| order.push(id));
        assert_eq!(order, vec![a, b, c, d]);
    }

    #[test]
    fn walk_world_matrices_match_world_matrix() {
        let mut scene = Scene::default();
        let a = scene.add(Node::group("a").with_transform(Transform::from_position(Vec3::Y)));
        let b = scene
            .add_child(a, ball().with_transform(Transform::from_position(Vec3::X)))
            .unwrap();

        scene.walk(|id, _, world| {
            assert_eq!(Some(world), scene.world_matrix(id));
        });
        let p = scene.world_matrix(b).unwrap().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn add_child_rejects_foreign_handle() {
        let mut other = Scene::default();
        other.add(Node::group("x"));
        other.add(Node::group("y"));
        let foreign = other.add(Node::group("z"));

        let mut scene = Scene::default();
        assert!(scene.add_child(foreign, ball()).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn descendant_count_is_recursive() {
        let mut scene = Scene::default();
        let a = scene.add(Node::group("a"));
        let b = scene.add_child(a, Node::group("b")).unwrap();
        for _ in 0..3 {
            scene.add_child(b, ball());
        }
        assert_eq!(scene.descendant_count(a), 4);
        assert_eq!(scene.descendant_count(b), 3);
    }
}
