//! Scene graph types.
//!
//! Responsibilities:
//! - node hierarchy with local transforms (children inherit parent motion)
//! - meshes, materials and lights as renderer-agnostic data
//! - perspective camera and the orbit controller that drives it
//! - flattening the graph into a per-frame draw stream

mod camera;
mod graph;
mod light;
mod list;
mod material;
mod mesh;
mod orbit;
mod transform;

pub use camera::PerspectiveCamera;
pub use graph::{Node, NodeId, NodeKind, Scene};
pub use light::{AmbientLight, DirectionalLight};
pub use list::{DrawItem, DrawList};
pub use material::{BasicMaterial, Material, PhongMaterial};
pub use mesh::{Mesh, SphereGeometry};
pub use orbit::OrbitControls;
pub use transform::{Euler, Transform};
