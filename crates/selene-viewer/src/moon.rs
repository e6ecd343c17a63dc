//! Moon scene construction.

use std::f32::consts::{PI, TAU};
use std::ops::Range;

use glam::Vec3;
use rand::Rng;
use selene_engine::paint::Color;
use selene_engine::scene::{
    AmbientLight, BasicMaterial, DirectionalLight, Mesh, Node, NodeId, PhongMaterial, Scene,
    SphereGeometry, Transform,
};

use crate::config::ViewerConfig;

/// Placement of one crater on the unit sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Crater {
    pub position: Vec3,
    pub radius: f32,
}

/// Scene graph plus handles to the nodes the viewer animates.
#[derive(Debug, Clone)]
pub struct MoonScene {
    pub scene: Scene,
    pub body: NodeId,
    pub craters: NodeId,
}

/// Draws `count` craters at random points of the unit sphere.
///
/// Azimuth is uniform in `[0, 2π)` and polar angle uniform in `[0, π)`;
/// radii are uniform in `radius`. An empty `radius` range yields `radius.start`.
pub fn scatter_craters<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    radius: Range<f32>,
) -> Vec<Crater> {
    (0..count)
        .map(|_| {
            let phi = rng.gen_range(0.0..TAU);
            let theta = rng.gen_range(0.0..PI);
            let radius = if radius.is_empty() {
                radius.start
            } else {
                rng.gen_range(radius.clone())
            };
            Crater {
                position: Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                ),
                radius,
            }
        })
        .collect()
}

/// Builds lights, the body sphere and its crater group.
pub fn build_scene<R: Rng + ?Sized>(config: &ViewerConfig, rng: &mut R) -> MoonScene {
    let mut scene = Scene::new(Color::from_hex(config.background));

    scene.ambient = Some(AmbientLight {
        color: Color::from_hex(config.ambient_color),
        intensity: config.ambient_intensity,
    });
    scene.directional.push(DirectionalLight {
        color: Color::from_hex(config.key_light_color),
        intensity: config.key_light_intensity,
        position: config.key_light_position,
        target: Vec3::ZERO,
    });

    let body = scene.add(Node::mesh(
        "moon",
        Mesh {
            geometry: SphereGeometry::new(
                config.body_radius,
                config.body_segments,
                config.body_segments,
            ),
            material: PhongMaterial {
                color: Color::from_hex(config.body_color),
                emissive: Color::from_hex(config.body_emissive),
                specular: Color::from_hex(config.body_specular),
                shininess: config.body_shininess,
            }
            .into(),
        },
    ));

    // `body` was just issued by this scene.
    let craters = scene
        .add_child(body, Node::group("craters"))
        .unwrap_or(body);

    let crater_geometry = |radius| {
        SphereGeometry::new(radius, config.crater_segments, config.crater_segments)
    };
    let crater_material = BasicMaterial {
        color: Color::from_hex(config.crater_color),
    };

    for crater in scatter_craters(rng, config.crater_count, config.crater_radius.clone()) {
        let node = Node::mesh(
            "crater",
            Mesh {
                geometry: crater_geometry(crater.radius),
                material: crater_material.into(),
            },
        )
        .with_transform(Transform::from_position(crater.position * config.body_radius));
        scene.add_child(craters, node);
    }

    log::info!(
        "moon scene built: {} nodes, {} craters",
        scene.len(),
        config.crater_count
    );

    MoonScene { scene, body, craters }
}
