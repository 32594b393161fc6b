//! Graphics labs.
//!
//! This crate provides a set of small, independent interactive graphics programs (labs) that can be run on any
//! platform able to provide an OpenGL 3.3 context. The labs are platform-agnostic on purpose: they never look at
//! system events or window capacities directly. Whenever a lab requires user interaction, it receives abstract
//! [`InputAction`]s, produced by the platform code running it.
//!
//! # Lab architecture
//!
//! Labs are simple modules exposed from this crate, each exporting a `LocalLab` type implementing [`Lab`]. A lab
//! allocates its luminance resources in [`Lab::bootstrap`] and advances / draws its scene in [`Lab::render_frame`].
//!
//! The scene logic the labs are built from lives in GPU-free modules so that it can be tested on its own:
//!
//! - [`rubik`]: the Rubik's cube puzzle engine (layer turns, scramble queue, solved detection).
//! - [`camera`]: the fly and orbit cameras.
//! - [`animation`]: time-driven scale / angle models.
//! - [`lighting`]: Phong lighting parameters.
//! - [`obj`]: a line-based Wavefront OBJ reader.

use luminance_front::{context::GraphicsContext, framebuffer::Framebuffer, texture::Dim2, Backend};
use std::{error::Error, fmt};

pub mod animation;
pub mod camera;
pub mod cube_grid;
pub mod isometric_cube;
pub mod lighting;
pub mod lit_cubes;
pub mod obj;
pub mod obj_viewer;
pub mod rubik;
pub mod rubiks_cube;
pub mod shared;

use rubik::Turn;

/// Lab interface.
pub trait Lab: Sized {
  /// Assets the lab needs. The platform is expected to make them available through [`PlatformServices`] before
  /// [`Lab::bootstrap`] is called.
  fn features() -> Features {
    Features::none()
  }

  /// Bootstrap the lab.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError>;

  /// Render a frame of the lab.
  ///
  /// `time` is the number of seconds elapsed since the lab started.
  fn render_frame(
    self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self>;
}

/// A type used to pass “inputs” to labs.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Main action. Typically used to switch an effect on and off.
  MainToggle,

  /// Auxiliary action. Often used to cycle through a smaller part of a bigger effect.
  AuxiliaryToggle,

  /// Left direction. Typically used to move the camera left.
  Left,

  /// Right direction. Typically used to move the camera right.
  Right,

  /// Forward direction.
  Forward,

  /// Backward direction.
  Backward,

  /// Up direction.
  Up,

  /// Down direction.
  Down,

  /// Primary button pressed (left mouse button).
  PrimaryPressed,

  /// Primary button released (left mouse button).
  PrimaryReleased,

  /// Cursor moved, in window coordinates.
  CursorMoved { x: f32, y: f32 },

  /// Vertical scroll.
  VScroll { amount: f32 },

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },

  /// Turn a layer of a cube puzzle.
  Turn(Turn),

  /// Scramble a puzzle.
  Scramble,

  /// Confirm / acknowledge what is currently shown.
  Confirm,

  /// Select the next tunable parameter.
  NextParameter,

  /// Select the previous tunable parameter.
  PreviousParameter,

  /// Increase the selected parameter.
  Increase,

  /// Decrease the selected parameter.
  Decrease,

  /// The input behind a direction action was let go.
  MotionReleased(Motion),
}

impl InputAction {
  /// Direction of a direction action ([`InputAction::Left`], [`InputAction::Forward`]…).
  pub fn motion(&self) -> Option<Motion> {
    match *self {
      InputAction::Left => Some(Motion::Left),
      InputAction::Right => Some(Motion::Right),
      InputAction::Forward => Some(Motion::Forward),
      InputAction::Backward => Some(Motion::Backward),
      InputAction::Up => Some(Motion::Up),
      InputAction::Down => Some(Motion::Down),
      _ => None,
    }
  }
}

/// Directions of the direction actions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Motion {
  Left,
  Right,
  Forward,
  Backward,
  Up,
  Down,
}

impl Motion {
  pub const ALL: [Motion; 6] = [
    Motion::Left,
    Motion::Right,
    Motion::Forward,
    Motion::Backward,
    Motion::Up,
    Motion::Down,
  ];

  pub fn index(self) -> usize {
    self as usize
  }

  /// The direction action going that way.
  pub fn action(self) -> InputAction {
    match self {
      Motion::Left => InputAction::Left,
      Motion::Right => InputAction::Right,
      Motion::Forward => InputAction::Forward,
      Motion::Backward => InputAction::Backward,
      Motion::Up => InputAction::Up,
      Motion::Down => InputAction::Down,
    }
  }
}

/// Feedback returned by a lab after rendering a frame.
#[derive(Clone, Debug)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Assets a lab needs, so that the platform can fetch them ahead of time.
#[derive(Clone, Debug, Default)]
pub struct Features {
  models: Vec<String>,
}

impl Features {
  /// No asset needed.
  pub fn none() -> Self {
    Self::default()
  }

  /// Require an OBJ model by name.
  pub fn model(mut self, name: impl Into<String>) -> Self {
    self.models.push(name.into());
    self
  }

  /// Names of the required OBJ models.
  pub fn models(&self) -> &[String] {
    &self.models
  }
}

/// Services the platform offers to labs.
pub trait PlatformServices {
  type FetchError: Error + 'static;

  /// Get the source of an OBJ model previously declared in [`Lab::features`].
  fn fetch_model(&mut self, name: impl AsRef<str>) -> Result<&str, Self::FetchError>;
}

/// Everything that can prevent a lab from starting.
#[derive(Debug)]
pub enum LabError {
  CannotCreateProgram(Box<dyn Error>),
  CannotCreateTess(Box<dyn Error>),
  CannotFetchModel(Box<dyn Error>),
  InvalidModel(obj::ObjError),
}

impl fmt::Display for LabError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      LabError::CannotCreateProgram(ref e) => write!(f, "cannot create shader program: {}", e),
      LabError::CannotCreateTess(ref e) => write!(f, "cannot create tessellation: {}", e),
      LabError::CannotFetchModel(ref e) => write!(f, "cannot fetch model: {}", e),
      LabError::InvalidModel(ref e) => write!(f, "invalid model: {}", e),
    }
  }
}

impl Error for LabError {}

impl From<obj::ObjError> for LabError {
  fn from(e: obj::ObjError) -> Self {
    LabError::InvalidModel(e)
  }
}
