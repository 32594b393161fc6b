//! A 3×3×3 grid of colored cubes, seen through a fly camera.
//!
//! Only the top layer turns: <q> turns it a quarter counter-clockwise, <w> clockwise; a turn has to finish before
//! the next one starts. Press the <main action> to start or freeze the pulse of the cubes.

use cgmath::Matrix4;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::PipelineState,
  render_state::RenderState,
  shader::{types::Mat44, Program},
  tess::Tess,
  texture::Dim2,
  Backend,
};
use std::f32::consts::FRAC_PI_2;

use crate::{
  animation::{Celebration, FrameClock},
  camera::FlyCamera,
  rubik::{ActiveTurn, Axis, Cubie, Direction, Puzzle, Turn},
  rubiks_cube::{axis_rotation, build_cubies, cubie_model},
  shared::{aspect_ratio, build_program, MvpInterface, Semantics, Vertex, VertexIndex, CLEAR_COLOR, FLAT_FS, MVP_VS},
  InputAction, Lab, LabError, LoopFeedback, PlatformServices,
};

/// Number of ticks a top layer quarter-turn lasts.
pub const TOP_TURN_TICKS: u32 = 80;

/// The turning top layer of the grid.
///
/// Cubes are never moved to another lattice point: the layer only accumulates quarter-turns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TopLayer {
  quarter_turns: i8,
  active: Option<ActiveTurn>,
}

impl TopLayer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_turning(&self) -> bool {
    self.active.is_some()
  }

  /// Start a quarter-turn.
  ///
  /// Returns `false` for turns of other layers and while the layer is already turning.
  pub fn request(&mut self, turn: Turn) -> bool {
    if turn.axis != Axis::Y || turn.layer != 1 || self.active.is_some() {
      return false;
    }

    self.active = Some(ActiveTurn {
      turn,
      elapsed: 0,
      duration: TOP_TURN_TICKS,
    });

    true
  }

  /// Advance the turn by one tick.
  pub fn tick(&mut self) {
    let mut active = match self.active {
      Some(active) => active,
      None => return,
    };

    active.elapsed += 1;

    if active.elapsed < active.duration {
      self.active = Some(active);
    } else {
      let quarter = match active.turn.direction {
        Direction::CounterClockwise => 1,
        Direction::Clockwise => -1,
      };

      self.quarter_turns = (self.quarter_turns + quarter).rem_euclid(4);
      self.active = None;
    }
  }

  /// Angle of the layer around the vertical axis, in radians.
  pub fn angle(&self) -> f32 {
    let settled = f32::from(self.quarter_turns) * FRAC_PI_2;
    settled + self.active.map_or(0., |active| active.angle())
  }
}

pub fn grid_model(cubie: &Cubie, top_angle: f32, pulse: &Celebration) -> Matrix4<f32> {
  let rest = cubie_model(cubie.position, pulse.scale());

  if cubie.position[1] == 1 {
    axis_rotation(Axis::Y, top_angle) * rest
  } else {
    rest
  }
}

pub struct LocalLab {
  program: Program<Semantics, (), MvpInterface>,
  grid: Vec<Cubie>,
  cubes: Vec<Tess<Vertex, VertexIndex>>,
  top: TopLayer,
  pulse: Celebration,
  camera: FlyCamera,
  clock: FrameClock,
  aspect_ratio: f32,
}

impl Lab for LocalLab {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError> {
    let program = build_program(context, MVP_VS, FLAT_FS)?;
    let grid = Puzzle::new().cubies().to_vec();
    let cubes = build_cubies(context, &grid)?;

    Ok(Self {
      program,
      grid,
      cubes,
      top: TopLayer::new(),
      pulse: Celebration::new(),
      camera: FlyCamera::new(),
      clock: FrameClock::default(),
      aspect_ratio: 1.,
    })
  }

  fn render_frame(
    mut self,
    t: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::Turn(turn) => {
          if !self.top.request(turn) {
            log::debug!("top layer busy or not turnable, ignoring {:?}", turn);
          }
        }

        InputAction::MainToggle => self.pulse.toggle(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        action => {
          self.camera.handle(&action);
        }
      }
    }

    self.top.tick();

    let dt = self.clock.delta(t);
    self.pulse.advance(dt);
    self.camera.advance(dt);
    let top_angle = self.top.angle();

    let models: Vec<_> = self
      .grid
      .iter()
      .map(|cubie| grid_model(cubie, top_angle, &self.pulse))
      .collect();

    let projection = Mat44::new(self.camera.projection(self.aspect_ratio));
    let view = Mat44::new(self.camera.view());
    let program = &mut self.program;
    let cubes = &self.cubes;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);

            models.iter().zip(cubes).try_for_each(|(model, tess)| {
              iface.set(&uni.model, Mat44::new(*model));
              rdr_gate.render(&RenderState::default(), |mut tess_gate| tess_gate.render(tess))
            })
          })
        },
      )
      .assume();

    if render.is_ok() {
      LoopFeedback::Continue(self)
    } else {
      LoopFeedback::Exit
    }
  }
}
