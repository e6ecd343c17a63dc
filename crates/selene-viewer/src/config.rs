use std::ops::Range;

use glam::Vec3;

/// Every tunable of the Moon viewer.
///
/// Colors are sRGB hex values; lengths are world units; angles are radians
/// unless the field name says otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub initial_size: (f64, f64),

    // ── scene ─────────────────────────────────────────────────────────────
    pub background: u32,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub key_light_color: u32,
    pub key_light_intensity: f32,
    pub key_light_position: Vec3,

    // ── body ──────────────────────────────────────────────────────────────
    pub body_radius: f32,
    pub body_segments: u32,
    pub body_color: u32,
    pub body_emissive: u32,
    pub body_specular: u32,
    pub body_shininess: f32,

    // ── craters ───────────────────────────────────────────────────────────
    pub crater_count: usize,
    pub crater_radius: Range<f32>,
    pub crater_segments: u32,
    pub crater_color: u32,

    // ── camera ────────────────────────────────────────────────────────────
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_start: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping_factor: f32,

    // ── motion ────────────────────────────────────────────────────────────
    /// Yaw added to the body every frame.
    pub rotation_speed: f32,
    /// Body rotation per logical pixel of drag.
    pub drag_sensitivity: f32,
    /// Camera distance change per wheel event.
    pub wheel_step: f32,
    /// Pointer drags rotate the body in addition to orbiting the camera.
    pub drag_rotates_body: bool,

    /// Fixed crater layout when set; entropy-seeded otherwise.
    pub seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Moon".to_string(),
            initial_size: (1280.0, 720.0),

            background: 0x111827,
            ambient_color: 0x404040,
            ambient_intensity: 0.5,
            key_light_color: 0xffffff,
            key_light_intensity: 1.0,
            key_light_position: Vec3::new(5.0, 5.0, 5.0),

            body_radius: 1.0,
            body_segments: 32,
            body_color: 0xf0f0f0,
            body_emissive: 0x888888,
            body_specular: 0xffffff,
            body_shininess: 30.0,

            crater_count: 50,
            crater_radius: 0.05..0.25,
            crater_segments: 16,
            crater_color: 0x555555,

            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_start: Vec3::new(0.0, 0.0, 5.0),
            min_distance: 1.5,
            max_distance: 100.0,
            damping_factor: 0.05,

            rotation_speed: 0.001,
            drag_sensitivity: 0.01,
            wheel_step: 0.1,
            drag_rotates_body: true,

            seed: None,
        }
    }
}
