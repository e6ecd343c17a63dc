//! Orbit camera controller.
//!
//! Rotates the camera around `target` on left drag, pans on right drag and
//! dollies on wheel. With damping enabled, input accumulates into pending
//! deltas that [`OrbitControls::update`] drains by `damping_factor` per call,
//! so motion keeps easing out after the pointer is released.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::coords::Viewport;
use crate::input::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

use super::PerspectiveCamera;

/// Keeps the polar angle off the poles, where `look_at` degenerates.
const POLAR_EPS: f32 = 1e-6;

/// Pending deltas smaller than this are treated as settled.
const SETTLE_EPS: f32 = 1e-6;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Spherical coordinates around the Y axis.
///
/// `theta` is the azimuth measured from +Z toward +X, `phi` the polar angle
/// from +Y.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit-style camera controller with optional inertial damping.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,

    pub enable_damping: bool,
    pub damping_factor: f32,

    pub enable_rotate: bool,
    pub rotate_speed: f32,

    pub enable_zoom: bool,
    pub zoom_speed: f32,

    pub enable_pan: bool,
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,

    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    pending: Spherical,
    scale: f32,
    pan_offset: Vec3,

    drag: Option<DragMode>,
    last_pointer: Option<(f32, f32)>,
    disposed: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            pending: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            drag: None,
            last_pointer: None,
            disposed: false,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self { target, ..Self::default() }
    }

    /// Detaches the controller. Input and updates are ignored afterwards.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.drag = None;
        self.last_pointer = None;
        self.pending = Spherical::default();
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds one input event. Returns `true` when the event changed controller state.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        viewport: Viewport,
        camera: &PerspectiveCamera,
    ) -> bool {
        if self.disposed {
            return false;
        }

        match event {
            InputEvent::PointerButton(PointerButtonEvent { button, state, position, .. }) => {
                match state {
                    MouseButtonState::Pressed => {
                        let mode = match button {
                            MouseButton::Left if self.enable_rotate => DragMode::Rotate,
                            MouseButton::Right if self.enable_pan => DragMode::Pan,
                            _ => return false,
                        };
                        self.drag = Some(mode);
                        // Unknown press position: the first move anchors the drag.
                        self.last_pointer = *position;
                        true
                    }
                    MouseButtonState::Released => {
                        let was_dragging = self.drag.take().is_some();
                        self.last_pointer = None;
                        was_dragging
                    }
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                let Some(mode) = self.drag else {
                    return false;
                };
                let Some((lx, ly)) = self.last_pointer.replace((*x, *y)) else {
                    return false;
                };
                let (dx, dy) = (x - lx, y - ly);
                match mode {
                    DragMode::Rotate => self.rotate_by_pixels(dx, dy, viewport),
                    DragMode::Pan => self.pan_by_pixels(dx, dy, viewport, camera),
                }
                true
            }

            InputEvent::MouseWheel { delta, .. } => {
                if !self.enable_zoom {
                    return false;
                }
                let notches = delta.page_notches_y();
                if notches == 0.0 {
                    return false;
                }
                let step = 0.95f32.powf(self.zoom_speed * notches.abs());
                if notches > 0.0 {
                    self.scale /= step;
                } else {
                    self.scale *= step;
                }
                true
            }

            InputEvent::Focused(false) | InputEvent::PointerLeft => {
                let was_dragging = self.drag.take().is_some();
                self.last_pointer = None;
                was_dragging
            }

            InputEvent::Focused(true) | InputEvent::ModifiersChanged(_) => false,
        }
    }

    /// Rotates around the target. One viewport height of drag is a full turn.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport: Viewport) {
        let height = viewport.height.max(1.0);
        self.pending.theta -= TAU * dx / height * self.rotate_speed;
        self.pending.phi -= TAU * dy / height * self.rotate_speed;
    }

    /// Pans target and camera so that the point under the cursor follows it.
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32, viewport: Viewport, camera: &PerspectiveCamera) {
        let height = viewport.height.max(1.0);
        let distance = (camera.position - self.target).length()
            * (camera.fov_y_deg.to_radians() * 0.5).tan();
        let (right, up) = camera.basis();
        let world_per_pixel = 2.0 * distance / height * self.pan_speed;
        self.pan_offset += -right * dx * world_per_pixel + up * dy * world_per_pixel;
    }

    /// Applies pending motion to `camera`. Call once per frame.
    ///
    /// The orbit offset is re-derived from the camera's current position, so
    /// callers may move the camera between updates. Returns `true` while
    /// motion is still pending.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if self.disposed {
            return false;
        }

        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let k = if self.enable_damping { self.damping_factor } else { 1.0 };

        spherical.theta += self.pending.theta * k;
        spherical.phi += self.pending.phi * k;

        let min_polar = self.min_polar_angle.max(POLAR_EPS);
        let max_polar = self.max_polar_angle.min(PI - POLAR_EPS);
        spherical.phi = spherical.phi.clamp(min_polar, max_polar);

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * k;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.pending.theta *= 1.0 - self.damping_factor;
            self.pending.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.pending = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        self.pending.theta.abs() > SETTLE_EPS
            || self.pending.phi.abs() > SETTLE_EPS
            || self.pan_offset.length_squared() > SETTLE_EPS * SETTLE_EPS
    }
}
