//! Cameras.
//!
//! [`FlyCamera`] moves freely in the scene and looks around with the mouse; [`OrbitCamera`] stays on a sphere
//! around the origin. Both react to [`InputAction`]s through their `handle` method.

use cgmath::{perspective, Deg, EuclideanSpace as _, InnerSpace as _, Matrix4, Point3, Rad, Vector3};

use crate::{InputAction, Motion};

/// Near clipping plane distance.
pub const Z_NEAR: f32 = 0.1;

/// Far clipping plane distance.
pub const Z_FAR: f32 = 100.;

/// Field of view of the orbit camera.
pub const ORBIT_FOVY: Deg<f32> = Deg(45.);

const LOOK_SENSITIVITY: f32 = 0.1;
const PITCH_LIMIT: f32 = 89.;
const MIN_ZOOM: f32 = 1.;
const MAX_ZOOM: f32 = 45.;
/// Fly camera speed, in units per second.
const FLY_SPEED: f32 = 2.5;

const ORBIT_ANGLE_STEP: Deg<f32> = Deg(5.);
const ORBIT_DISTANCE_FACTOR: f32 = 1.1;

/// Drag state of the primary button, turning absolute cursor positions into deltas.
#[derive(Clone, Debug, Default)]
pub struct CursorDrag {
  dragging: bool,
  last: Option<[f32; 2]>,
}

impl CursorDrag {
  pub fn press(&mut self) {
    self.dragging = true;
  }

  pub fn release(&mut self) {
    self.dragging = false;
  }

  /// Delta since the previous cursor position if the button is held.
  pub fn moved(&mut self, x: f32, y: f32) -> Option<[f32; 2]> {
    let last = self.last.replace([x, y]);

    if self.dragging {
      last.map(|[lx, ly]| [x - lx, y - ly])
    } else {
      None
    }
  }
}

/// First-person camera.
#[derive(Clone, Debug)]
pub struct FlyCamera {
  position: Point3<f32>,
  yaw: f32,
  pitch: f32,
  zoom: f32,
  drag: CursorDrag,
  /// Directions currently held, indexed by [`Motion::index`].
  held: [bool; 6],
}

impl Default for FlyCamera {
  fn default() -> Self {
    FlyCamera {
      position: Point3::new(0., 0., 8.),
      yaw: -90.,
      pitch: 0.,
      zoom: MAX_ZOOM,
      drag: CursorDrag::default(),
      held: [false; 6],
    }
  }
}

impl FlyCamera {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn position(&self) -> Point3<f32> {
    self.position
  }

  /// Vertical field of view, in degrees.
  pub fn zoom(&self) -> f32 {
    self.zoom
  }

  pub fn pitch(&self) -> f32 {
    self.pitch
  }

  pub fn yaw(&self) -> f32 {
    self.yaw
  }

  pub fn front(&self) -> Vector3<f32> {
    let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
    Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
  }

  pub fn right(&self) -> Vector3<f32> {
    self.front().cross(Vector3::unit_y()).normalize()
  }

  /// Turn the camera by a cursor displacement, in pixels.
  pub fn look(&mut self, dx: f32, dy: f32) {
    self.yaw += dx * LOOK_SENSITIVITY;
    self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
  }

  pub fn zoom_by(&mut self, amount: f32) {
    self.zoom = (self.zoom - amount).clamp(MIN_ZOOM, MAX_ZOOM);
  }

  pub fn move_forward(&mut self, step: f32) {
    self.position += self.front() * step;
  }

  pub fn move_backward(&mut self, step: f32) {
    self.move_forward(-step);
  }

  pub fn move_right(&mut self, step: f32) {
    self.position += self.right() * step;
  }

  pub fn move_left(&mut self, step: f32) {
    self.move_right(-step);
  }

  pub fn move_up(&mut self, step: f32) {
    self.position += Vector3::unit_y() * step;
  }

  pub fn move_down(&mut self, step: f32) {
    self.move_up(-step);
  }

  pub fn is_moving(&self) -> bool {
    self.held.iter().any(|&held| held)
  }

  /// Move along every held direction for `dt` seconds.
  pub fn advance(&mut self, dt: f32) {
    let step = FLY_SPEED * dt;

    for motion in Motion::ALL {
      if !self.held[motion.index()] {
        continue;
      }

      match motion {
        Motion::Forward => self.move_forward(step),
        Motion::Backward => self.move_backward(step),
        Motion::Left => self.move_left(step),
        Motion::Right => self.move_right(step),
        Motion::Up => self.move_up(step),
        Motion::Down => self.move_down(step),
      }
    }
  }

  /// React to an input action. Returns whether the action was used.
  ///
  /// Direction actions start moving the camera, [`InputAction::MotionReleased`] stops it; the motion itself happens
  /// in [`FlyCamera::advance`].
  pub fn handle(&mut self, action: &InputAction) -> bool {
    if let Some(motion) = action.motion() {
      self.held[motion.index()] = true;
      return true;
    }

    match *action {
      InputAction::MotionReleased(motion) => self.held[motion.index()] = false,
      InputAction::PrimaryPressed => self.drag.press(),
      InputAction::PrimaryReleased => self.drag.release(),
      InputAction::CursorMoved { x, y } => {
        if let Some([dx, dy]) = self.drag.moved(x, y) {
          self.look(dx, dy);
        }
      }
      InputAction::VScroll { amount } => self.zoom_by(amount),
      _ => return false,
    }

    true
  }

  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(self.position, self.position + self.front(), Vector3::unit_y())
  }

  pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
    perspective(Deg(self.zoom), aspect, Z_NEAR, Z_FAR)
  }
}

/// Camera orbiting around the origin.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
  distance: f32,
  /// Angle above the horizontal plane.
  elevation: Rad<f32>,
  /// Angle around the vertical axis, zero looking down -Z.
  azimuth: Rad<f32>,
}

impl Default for OrbitCamera {
  fn default() -> Self {
    OrbitCamera {
      distance: 4.,
      elevation: Rad(0.),
      azimuth: Rad(0.),
    }
  }
}

impl OrbitCamera {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn distance(&self) -> f32 {
    self.distance
  }

  pub fn rotate(&mut self, elevation: impl Into<Rad<f32>>, azimuth: impl Into<Rad<f32>>) {
    self.elevation += elevation.into();
    self.azimuth += azimuth.into();
  }

  pub fn approach(&mut self) {
    self.distance /= ORBIT_DISTANCE_FACTOR;
  }

  pub fn recede(&mut self) {
    self.distance *= ORBIT_DISTANCE_FACTOR;
  }

  fn point(distance: f32, elevation: Rad<f32>, azimuth: Rad<f32>) -> Vector3<f32> {
    Vector3::new(
      distance * elevation.0.cos() * azimuth.0.sin(),
      distance * elevation.0.sin(),
      distance * elevation.0.cos() * azimuth.0.cos(),
    )
  }

  pub fn position(&self) -> Point3<f32> {
    Point3::from_vec(Self::point(self.distance, self.elevation, self.azimuth))
  }

  /// Up direction: the position direction tilted a quarter-turn upwards.
  ///
  /// Unlike a fixed +Y, it stays valid when the camera passes over the poles.
  pub fn up(&self) -> Vector3<f32> {
    Self::point(1., self.elevation + Rad::from(Deg(90.)), self.azimuth).normalize()
  }

  /// React to an input action. Returns whether the action was used.
  pub fn handle(&mut self, action: &InputAction) -> bool {
    let zero = Deg(0.);

    match *action {
      InputAction::Left => self.rotate(zero, -ORBIT_ANGLE_STEP),
      InputAction::Right => self.rotate(zero, ORBIT_ANGLE_STEP),
      InputAction::Up => self.rotate(ORBIT_ANGLE_STEP, zero),
      InputAction::Down => self.rotate(-ORBIT_ANGLE_STEP, zero),
      InputAction::Forward => self.approach(),
      InputAction::Backward => self.recede(),
      InputAction::VScroll { amount } if amount > 0. => self.approach(),
      InputAction::VScroll { amount } if amount < 0. => self.recede(),
      _ => return false,
    }

    true
  }

  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(self.position(), Point3::origin(), self.up())
  }

  pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
    perspective(ORBIT_FOVY, aspect, Z_NEAR, Z_FAR)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{EuclideanSpace as _, InnerSpace as _, Transform as _, Vector4};

  fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).magnitude() < 1e-4
  }

  #[test]
  fn fly_camera_starts_looking_at_origin() {
    let cam = FlyCamera::new();

    assert!(close(cam.front(), Vector3::new(0., 0., -1.)));

    let origin = cam.view() * Vector4::new(0., 0., 0., 1.);
    assert!(close(origin.truncate(), Vector3::new(0., 0., -8.)));
  }

  #[test]
  fn fly_camera_clamps_pitch_and_zoom() {
    let mut cam = FlyCamera::new();

    cam.look(0., -10_000.);
    assert_eq!(cam.pitch(), 89.);
    cam.look(0., 10_000.);
    assert_eq!(cam.pitch(), -89.);

    cam.zoom_by(100.);
    assert_eq!(cam.zoom(), 1.);
    cam.zoom_by(-100.);
    assert_eq!(cam.zoom(), 45.);
  }

  #[test]
  fn fly_camera_moves_along_its_axes() {
    let mut cam = FlyCamera::new();

    cam.move_forward(1.);
    assert!(close(cam.position().to_vec(), Vector3::new(0., 0., 7.)));

    cam.move_right(2.);
    assert!(close(cam.position().to_vec(), Vector3::new(2., 0., 7.)));

    cam.move_down(1.);
    assert!(close(cam.position().to_vec(), Vector3::new(2., -1., 7.)));
  }

  #[test]
  fn fly_camera_moves_while_held() {
    let mut cam = FlyCamera::new();

    assert!(cam.handle(&InputAction::Forward));
    // key repeats don't speed it up
    cam.handle(&InputAction::Forward);
    assert!(cam.is_moving());

    cam.advance(0.2);
    cam.advance(0.2);
    assert!(close(cam.position().to_vec(), Vector3::new(0., 0., 7.)));

    assert!(cam.handle(&InputAction::MotionReleased(Motion::Forward)));
    assert!(!cam.is_moving());

    cam.advance(1.);
    assert!(close(cam.position().to_vec(), Vector3::new(0., 0., 7.)));
  }

  #[test]
  fn fly_camera_combines_held_directions() {
    let mut cam = FlyCamera::new();

    cam.handle(&InputAction::Right);
    cam.handle(&InputAction::Up);
    cam.advance(0.4);

    assert!(close(cam.position().to_vec(), Vector3::new(1., 1., 8.)));
  }

  #[test]
  fn fly_camera_looks_only_while_dragging() {
    let mut cam = FlyCamera::new();

    assert!(cam.handle(&InputAction::CursorMoved { x: 0., y: 0. }));
    cam.handle(&InputAction::CursorMoved { x: 50., y: 0. });
    assert_eq!(cam.yaw(), -90.);

    cam.handle(&InputAction::PrimaryPressed);
    cam.handle(&InputAction::CursorMoved { x: 100., y: 0. });
    assert!((cam.yaw() + 85.).abs() < 1e-4);

    cam.handle(&InputAction::PrimaryReleased);
    cam.handle(&InputAction::CursorMoved { x: 200., y: 0. });
    assert!((cam.yaw() + 85.).abs() < 1e-4);

    assert!(!cam.handle(&InputAction::Scramble));
  }

  #[test]
  fn orbit_camera_starts_in_front() {
    let cam = OrbitCamera::new();

    assert!(close(cam.position().to_vec(), Vector3::new(0., 0., 4.)));
    assert!(close(cam.up(), Vector3::unit_y()));

    let origin = cam.view().transform_point(Point3::origin());
    assert!(close(origin.to_vec(), Vector3::new(0., 0., -4.)));
  }

  #[test]
  fn orbit_camera_over_the_pole() {
    let mut cam = OrbitCamera::new();
    cam.rotate(Deg(90.), Deg(0.));

    assert!(close(cam.position().to_vec(), Vector3::new(0., 4., 0.)));
    assert!(close(cam.up(), Vector3::new(0., 0., -1.)));
  }

  #[test]
  fn orbit_camera_steps() {
    let mut cam = OrbitCamera::new();

    for _ in 0..18 {
      cam.handle(&InputAction::Right);
    }

    assert!(close(cam.position().to_vec(), Vector3::new(4., 0., 0.)));

    cam.handle(&InputAction::Backward);
    assert!((cam.distance() - 4.4).abs() < 1e-4);

    cam.handle(&InputAction::VScroll { amount: 1. });
    assert!((cam.distance() - 4.).abs() < 1e-4);

    assert!(!cam.handle(&InputAction::VScroll { amount: 0. }));
  }
}
