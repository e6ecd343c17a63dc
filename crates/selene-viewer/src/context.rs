//! Owned viewer state: scene, camera, controller and interaction flags.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use selene_engine::coords::Viewport;
use selene_engine::input::{InputEvent, MouseButtonState, PointerButtonEvent, PointerMoveEvent};
use selene_engine::scene::{Euler, NodeId, OrbitControls, PerspectiveCamera, Scene};

use crate::config::ViewerConfig;
use crate::moon::build_scene;

/// Body drag state. `last` holds the previous pointer position in logical px,
/// or `None` until the first position of the drag is known.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub last: Option<(f32, f32)>,
}

/// Wraps an angle into `[0, 2π)`.
fn wrap_angle(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// Everything the render loop and the input handlers touch.
///
/// Created once per window; all mutation happens on the event-loop thread.
#[derive(Debug)]
pub struct SceneContext {
    config: ViewerConfig,
    scene: Scene,
    body: NodeId,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    drag: DragState,
    stopped: bool,
}

impl SceneContext {
    /// Builds the scene using `config.seed`, or an entropy-seeded RNG.
    pub fn new(config: ViewerConfig, viewport: Viewport) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, viewport, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: ViewerConfig, viewport: Viewport, rng: &mut R) -> Self {
        let moon = build_scene(&config, rng);

        let mut camera = PerspectiveCamera::new(
            config.fov_y_deg,
            viewport.aspect().unwrap_or(1.0),
            config.near,
            config.far,
        );
        camera.position = config.camera_start;

        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.enable_damping = true;
        controls.damping_factor = config.damping_factor;
        // The viewer owns wheel zoom and keeps the camera aimed at the origin.
        controls.enable_zoom = false;
        controls.enable_pan = false;
        controls.min_distance = config.min_distance;
        controls.max_distance = config.max_distance;
        camera.look_at(controls.target);

        Self {
            config,
            scene: moon.scene,
            body: moon.body,
            camera,
            controls,
            viewport,
            drag: DragState::default(),
            stopped: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Body orientation (pitch `x`, yaw `y`).
    pub fn body_rotation(&self) -> Euler {
        self.scene
            .node(self.body)
            .map(|n| n.transform.rotation)
            .unwrap_or_default()
    }

    /// Distance from the camera to the body's origin.
    pub fn camera_distance(&self) -> f32 {
        (self.camera.position - self.body_origin()).length()
    }

    fn body_origin(&self) -> Vec3 {
        self.scene
            .world_matrix(self.body)
            .map_or(Vec3::ZERO, |m| m.w_axis.truncate())
    }

    fn rotate_body(&mut self, pitch: f32, yaw: f32) {
        if let Some(node) = self.scene.node_mut(self.body) {
            let rotation = &mut node.transform.rotation;
            rotation.x = wrap_angle(rotation.x + pitch);
            rotation.y = wrap_angle(rotation.y + yaw);
        }
    }

    // ── render loop ──────────────────────────────────────────────────────

    /// Advances one frame: orbit damping, then the body's idle spin.
    ///
    /// Returns `false` once stopped; the caller skips drawing.
    pub fn tick(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.controls.update(&mut self.camera);
        self.rotate_body(0.0, self.config.rotation_speed);
        true
    }

    // ── input ────────────────────────────────────────────────────────────

    /// Routes one input event to the body handlers and the orbit controller.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.stopped {
            return;
        }

        if self.config.drag_rotates_body {
            match event {
                InputEvent::PointerButton(PointerButtonEvent { state, position, .. }) => match state {
                    MouseButtonState::Pressed => self.start_drag(*position),
                    MouseButtonState::Released => self.on_pointer_up(),
                },
                InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.on_pointer_move(*x, *y),
                InputEvent::Focused(false) => self.on_pointer_up(),
                _ => {}
            }
        }

        if let InputEvent::MouseWheel { delta, .. } = event {
            self.on_wheel(delta.page_notches_y());
        }

        self.controls.handle_input(event, self.viewport, &self.camera);
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.start_drag(Some((x, y)));
    }

    /// Starts a body drag. Without a known position the next move only
    /// anchors the drag.
    fn start_drag(&mut self, position: Option<(f32, f32)>) {
        self.drag = DragState {
            dragging: true,
            last: position,
        };
    }

    /// Rotates the body by the pointer delta while dragging.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.drag.dragging {
            return;
        }
        let Some((lx, ly)) = self.drag.last.replace((x, y)) else {
            return;
        };
        let k = self.config.drag_sensitivity;
        self.rotate_body((y - ly) * k, (x - lx) * k);
    }

    pub fn on_pointer_up(&mut self) {
        self.drag.dragging = false;
    }

    /// Moves the camera radially from the body by one wheel step.
    ///
    /// `delta_y` follows the page convention: positive scrolls down and moves
    /// away, negative moves closer. A zero delta leaves the camera in place
    /// rather than counting as a scroll up.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let step = if delta_y > 0.0 {
            self.config.wheel_step
        } else {
            -self.config.wheel_step
        };

        let origin = self.body_origin();
        let offset = self.camera.position - origin;
        let dir = offset.try_normalize().unwrap_or(Vec3::Z);
        let distance =
            (offset.length() + step).clamp(self.config.min_distance, self.config.max_distance);
        self.camera.position = origin + dir * distance;
    }

    /// Tracks the new viewport. Camera position and body state are untouched.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.stopped {
            return;
        }
        let Some(aspect) = viewport.aspect() else {
            return;
        };
        self.viewport = viewport;
        self.camera.set_aspect(aspect);
    }

    /// Stops the loop and releases the controller.
    ///
    /// Returns `false` when already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;
        self.drag = DragState::default();
        self.controls.dispose();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selene_engine::input::{Modifiers, MouseButton, MouseWheelDelta};

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn ctx() -> SceneContext {
        let config = ViewerConfig {
            seed: Some(42),
            ..ViewerConfig::default()
        };
        SceneContext::new(config, VIEWPORT)
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    fn release(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            position: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn wheel_lines(y: f32) -> InputEvent {
        InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y },
            modifiers: Modifiers::default(),
        }
    }

    // ── setup ────────────────────────────────────────────────────────────

    #[test]
    fn initial_camera_looks_at_origin_from_z5() {
        let c = ctx();
        assert_eq!(c.camera().position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(c.camera().target, Vec3::ZERO);
        assert!((c.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(c.camera().fov_y_deg, 75.0);
    }

    #[test]
    fn controls_are_damped() {
        let c = ctx();
        assert!(c.controls().enable_damping);
        assert_eq!(c.controls().damping_factor, 0.05);
    }

    // ── tick ─────────────────────────────────────────────────────────────

    #[test]
    fn idle_ticks_spin_body() {
        let mut c = ctx();
        let start = c.body_rotation().y;
        for _ in 0..100 {
            assert!(c.tick());
        }
        assert!((c.body_rotation().y - (start + 0.1)).abs() < 1e-5);
        assert_eq!(c.body_rotation().x, 0.0);
    }

    #[test]
    fn idle_ticks_keep_camera_in_place() {
        let mut c = ctx();
        for _ in 0..10 {
            c.tick();
        }
        assert!((c.camera().position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn yaw_wraps_and_keeps_spinning() {
        let mut c = ctx();
        // 628 px of drag puts yaw just below 2π.
        c.on_pointer_down(0.0, 0.0);
        c.on_pointer_move(628.0, 0.0);
        c.on_pointer_up();
        assert!(c.body_rotation().y > TAU - 0.01);

        let mut prev = c.body_rotation().y;
        let mut wrapped = false;
        for _ in 0..20 {
            c.tick();
            let yaw = c.body_rotation().y;
            assert!((0.0..TAU).contains(&yaw), "yaw {yaw}");
            if yaw < prev {
                wrapped = true;
            } else {
                assert!(yaw - prev > 0.0009, "spin stalled at {yaw}");
            }
            prev = yaw;
        }
        assert!(wrapped);
        assert!(prev > 0.0 && prev < 0.02);
    }

    #[test]
    fn long_runs_keep_full_spin_rate() {
        let mut c = ctx();
        for _ in 0..50_000 {
            c.tick();
        }
        let before = c.body_rotation().y;
        c.tick();
        let after = c.body_rotation().y;
        assert!(before < TAU);
        let step = (after - before).rem_euclid(TAU);
        assert!((step - 0.001).abs() < 1e-4, "step {step}");
    }

    #[test]
    fn upward_drag_wraps_pitch_into_range() {
        let mut c = ctx();
        c.on_pointer_down(0.0, 100.0);
        c.on_pointer_move(0.0, 80.0);
        let pitch = c.body_rotation().x;
        assert!((pitch - (TAU - 0.2)).abs() < 1e-5);
    }

    // ── pointer ──────────────────────────────────────────────────────────

    #[test]
    fn drag_rotates_body() {
        let mut c = ctx();
        c.on_pointer_down(100.0, 100.0);
        c.on_pointer_move(150.0, 120.0);
        let r = c.body_rotation();
        assert!((r.y - 0.5).abs() < 1e-6);
        assert!((r.x - 0.2).abs() < 1e-6);
        assert_eq!(c.drag().last, Some((150.0, 120.0)));
        assert!(c.drag().dragging);
    }

    #[test]
    fn move_after_release_is_ignored() {
        let mut c = ctx();
        c.on_pointer_down(100.0, 100.0);
        c.on_pointer_up();
        c.on_pointer_move(300.0, 300.0);
        assert_eq!(c.body_rotation(), Euler::default());
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut c = ctx();
        c.on_pointer_move(10.0, 10.0);
        assert_eq!(c.body_rotation(), Euler::default());
    }

    #[test]
    fn input_events_drive_body_and_orbit() {
        let mut c = ctx();
        c.handle_input(&moved(100.0, 100.0));
        c.handle_input(&press(100.0, 100.0));
        c.handle_input(&moved(150.0, 120.0));
        c.handle_input(&release(150.0, 120.0));

        let r = c.body_rotation();
        assert!((r.y - 0.5).abs() < 1e-6);
        assert!((r.x - 0.2).abs() < 1e-6);
        assert!(!c.drag().dragging);

        // Orbit inertia moves the camera on the next tick.
        c.tick();
        assert!((c.camera().position - Vec3::new(0.0, 0.0, 5.0)).length() > 1e-3);
        assert!((c.camera_distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn press_without_position_anchors_on_first_move() {
        let mut c = ctx();
        c.handle_input(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: None,
            modifiers: Modifiers::default(),
        }));
        assert!(c.drag().dragging);

        c.handle_input(&moved(641.0, 360.0));
        assert_eq!(c.body_rotation(), Euler::default());
        assert_eq!(c.drag().last, Some((641.0, 360.0)));
        c.tick();
        assert!((c.camera().position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);

        c.handle_input(&moved(651.0, 360.0));
        assert!((c.body_rotation().y - (0.1 + 0.001)).abs() < 1e-5);
    }

    #[test]
    fn focus_loss_ends_drag() {
        let mut c = ctx();
        c.handle_input(&press(0.0, 0.0));
        c.handle_input(&InputEvent::Focused(false));
        c.handle_input(&moved(40.0, 40.0));
        assert_eq!(c.body_rotation(), Euler::default());
    }

    #[test]
    fn body_drag_can_be_disabled() {
        let config = ViewerConfig {
            seed: Some(1),
            drag_rotates_body: false,
            ..ViewerConfig::default()
        };
        let mut c = SceneContext::new(config, VIEWPORT);
        c.handle_input(&press(0.0, 0.0));
        c.handle_input(&moved(50.0, 0.0));
        assert_eq!(c.body_rotation(), Euler::default());
        assert!(c.controls().is_dragging());
    }

    // ── wheel ────────────────────────────────────────────────────────────

    #[test]
    fn wheel_down_moves_away() {
        let mut c = ctx();
        c.on_wheel(1.0);
        assert!((c.camera_distance() - 5.1).abs() < 1e-5);
    }

    #[test]
    fn wheel_up_moves_closer() {
        let mut c = ctx();
        c.on_wheel(-3.0);
        assert!((c.camera_distance() - 4.9).abs() < 1e-5);
    }

    #[test]
    fn wheel_event_uses_page_convention() {
        let mut c = ctx();
        // winit line delta: negative y scrolls down.
        c.handle_input(&wheel_lines(-1.0));
        assert!((c.camera_distance() - 5.1).abs() < 1e-5);
        c.handle_input(&wheel_lines(1.0));
        assert!((c.camera_distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn wheel_respects_distance_clamps() {
        let mut c = ctx();
        for _ in 0..100 {
            c.on_wheel(-1.0);
        }
        assert!((c.camera_distance() - 1.5).abs() < 1e-5);
        assert!(c.camera().position.z > 0.0);
    }

    #[test]
    fn wheel_distance_survives_tick() {
        let mut c = ctx();
        c.on_wheel(1.0);
        c.tick();
        assert!((c.camera_distance() - 5.1).abs() < 1e-4);
    }

    #[test]
    fn zero_wheel_is_ignored() {
        let mut c = ctx();
        c.on_wheel(0.0);
        assert_eq!(c.camera().position, Vec3::new(0.0, 0.0, 5.0));
    }

    // ── resize ───────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_aspect_only() {
        let mut c = ctx();
        c.on_pointer_down(0.0, 0.0);
        c.on_pointer_move(10.0, 0.0);
        let rotation = c.body_rotation();
        let position = c.camera().position;

        c.on_resize(Viewport::new(1000.0, 500.0));

        assert_eq!(c.camera().aspect, 2.0);
        assert_eq!(c.camera().position, position);
        assert_eq!(c.body_rotation(), rotation);
    }

    #[test]
    fn degenerate_resize_is_ignored() {
        let mut c = ctx();
        c.on_resize(Viewport::new(800.0, 0.0));
        assert!((c.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    // ── teardown ─────────────────────────────────────────────────────────

    #[test]
    fn teardown_stops_ticks() {
        let mut c = ctx();
        c.tick();
        let yaw = c.body_rotation().y;

        assert!(c.teardown());
        assert!(!c.tick());
        assert_eq!(c.body_rotation().y, yaw);
        assert!(c.controls().is_disposed());
    }

    #[test]
    fn resize_after_teardown_is_ignored() {
        let mut c = ctx();
        c.teardown();
        c.on_resize(Viewport::new(1000.0, 500.0));
        assert!((c.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn second_teardown_is_noop() {
        let mut c = ctx();
        assert!(c.teardown());
        assert!(!c.teardown());
        assert!(c.is_stopped());
    }

    #[test]
    fn input_after_teardown_is_ignored() {
        let mut c = ctx();
        c.teardown();
        c.handle_input(&press(0.0, 0.0));
        c.handle_input(&moved(100.0, 0.0));
        c.handle_input(&wheel_lines(-1.0));
        assert_eq!(c.body_rotation(), Euler::default());
        assert_eq!(c.camera().position, Vec3::new(0.0, 0.0, 5.0));
    }
}
