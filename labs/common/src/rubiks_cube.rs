//! A playable Rubik's cube.
//!
//! Turn layers with the letter keys (three layers per row of keys, the row below turns them back), press <r> to
//! scramble the cube. Solving it by hand makes the whole cube spin and pulse until <enter> is pressed.
//!
//! The camera flies with the <forward>, <backward>, <left>, <right>, <up> and <down> actions; drag with the
//! primary button to look around and scroll to zoom.

use cgmath::{Matrix4, Rad, Vector3};
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::PipelineState,
  render_state::RenderState,
  shader::{types::Mat44, Program},
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

use crate::{
  animation::{Celebration, FrameClock},
  camera::FlyCamera,
  rubik::{Axis, Cubie, Puzzle, PuzzleEvent, Turn, SCRAMBLE_LENGTH},
  shared::{
    aspect_ratio, build_program, cube, recolor_cube, MvpInterface, Semantics, Vertex, VertexIndex, CLEAR_COLOR,
    FLAT_FS, MVP_VS,
  },
  InputAction, Lab, LabError, LoopFeedback, PlatformServices,
};

/// One tessellation per cubie, colored after its faces.
pub(crate) fn build_cubies(
  context: &mut impl GraphicsContext<Backend = Backend>,
  cubies: &[Cubie],
) -> Result<Vec<Tess<Vertex, VertexIndex>>, LabError> {
  cubies
    .iter()
    .map(|cubie| {
      let (vertices, indices) = cube(cubie.face_colors());

      context
        .new_tess()
        .set_vertices(&vertices[..])
        .set_indices(&indices[..])
        .set_mode(Mode::Triangle)
        .build()
        .map_err(|e| LabError::CannotCreateTess(Box::new(e)))
    })
    .collect()
}

pub(crate) fn axis_rotation(axis: Axis, angle: f32) -> Matrix4<f32> {
  match axis {
    Axis::X => Matrix4::from_angle_x(Rad(angle)),
    Axis::Y => Matrix4::from_angle_y(Rad(angle)),
    Axis::Z => Matrix4::from_angle_z(Rad(angle)),
  }
}

/// Model matrix of a cubie at rest.
pub fn cubie_model(position: [i8; 3], scale: f32) -> Matrix4<f32> {
  let [x, y, z] = position;
  let translation = Vector3::new(f32::from(x), f32::from(y), f32::from(z));

  Matrix4::from_translation(translation) * Matrix4::from_scale(scale)
}

/// Model matrix of a cubie, taking the turning layer or the celebration into account.
pub fn puzzle_model(cubie: &Cubie, animation: Option<(Turn, f32)>, celebration: &Celebration) -> Matrix4<f32> {
  let rest = cubie_model(cubie.position, celebration.scale());

  if celebration.is_enabled() {
    let spin = Rad(2. * celebration.spin());
    return Matrix4::from_angle_x(spin) * Matrix4::from_angle_y(spin) * Matrix4::from_angle_z(spin) * rest;
  }

  match animation {
    Some((turn, angle)) if turn.contains(cubie.position) => axis_rotation(turn.axis, angle) * rest,
    _ => rest,
  }
}

pub struct LocalLab {
  program: Program<Semantics, (), MvpInterface>,
  cubies: Vec<Tess<Vertex, VertexIndex>>,
  puzzle: Puzzle,
  celebration: Celebration,
  camera: FlyCamera,
  clock: FrameClock,
  aspect_ratio: f32,
}

impl LocalLab {
  fn recolor(&mut self) {
    for (tess, cubie) in self.cubies.iter_mut().zip(self.puzzle.cubies()) {
      match tess.vertices_mut() {
        Ok(mut vertices) => recolor_cube(&mut vertices, cubie.face_colors()),
        Err(e) => log::error!("cannot recolor cubie: {}", e),
      }
    }
  }
}

impl Lab for LocalLab {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError> {
    let program = build_program(context, MVP_VS, FLAT_FS)?;
    let puzzle = Puzzle::new();
    let cubies = build_cubies(context, puzzle.cubies())?;

    Ok(Self {
      program,
      cubies,
      puzzle,
      celebration: Celebration::new(),
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
          if !self.puzzle.request_turn(turn) {
            log::debug!("puzzle busy, ignoring {:?}", turn);
          }
        }

        InputAction::Scramble => {
          if self.puzzle.scramble(&mut rand::thread_rng(), SCRAMBLE_LENGTH) {
            log::info!("scrambling with {} turns", SCRAMBLE_LENGTH);
          } else {
            log::warn!("cannot scramble now");
          }
        }

        InputAction::Confirm if self.puzzle.is_celebrating() => {
          self.puzzle.dismiss_celebration();
          self.celebration.reset();
        }

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        action => {
          self.camera.handle(&action);
        }
      }
    }

    match self.puzzle.tick() {
      Some(PuzzleEvent::TurnCompleted(_)) => self.recolor(),

      Some(PuzzleEvent::Solved) => {
        log::info!("solved! press enter to continue");
        self.recolor();
        self.celebration.enable();
      }

      None => (),
    }

    let dt = self.clock.delta(t);
    self.celebration.advance(dt);
    self.camera.advance(dt);

    let animation = self.puzzle.animation();
    let models: Vec<_> = self
      .puzzle
      .cubies()
      .iter()
      .map(|cubie| puzzle_model(cubie, animation, &self.celebration))
      .collect();

    let projection = Mat44::new(self.camera.projection(self.aspect_ratio));
    let view = Mat44::new(self.camera.view());
    let program = &mut self.program;
    let cubies = &self.cubies;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);

            models.iter().zip(cubies).try_for_each(|(model, tess)| {
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

#[cfg(test)]
mod tests {
  use super::*;
  use crate::animation::CUBIE_SCALE;
  use cgmath::{Transform as _, Point3};
  use std::f32::consts::FRAC_PI_2;

  fn close(a: Point3<f32>, b: [f32; 3]) -> bool {
    (a.x - b[0]).abs() < 1e-4 && (a.y - b[1]).abs() < 1e-4 && (a.z - b[2]).abs() < 1e-4
  }

  #[test]
  fn resting_cubie_sits_on_its_lattice_point() {
    let cubie = Cubie::solved([1, -1, 0]);
    let model = puzzle_model(&cubie, None, &Celebration::new());

    assert!(close(model.transform_point(Point3::new(0., 0., 0.)), [1., -1., 0.]));
    assert!(close(
      model.transform_point(Point3::new(0.5, 0.5, 0.5)),
      [1. + CUBIE_SCALE / 2., -1. + CUBIE_SCALE / 2., CUBIE_SCALE / 2.]
    ));
  }

  #[test]
  fn full_layer_animation_lands_where_the_turn_moves_the_cubie() {
    for turn in Turn::ALL {
      for position in [[1, 1, 1], [0, 1, -1], [-1, 0, 1]] {
        let mut cubie = Cubie::solved(position);

        if !turn.contains(position) {
          continue;
        }

        let animated = puzzle_model(&cubie, Some((turn, turn.angle(1.))), &Celebration::new());
        let center = animated.transform_point(Point3::new(0., 0., 0.));

        cubie.turn(&turn);
        let [x, y, z] = cubie.position;
        assert!(close(center, [f32::from(x), f32::from(y), f32::from(z)]), "{:?}", turn);
      }
    }
  }

  #[test]
  fn other_layers_do_not_move() {
    let turn = Turn::from_key('q').unwrap();
    let cubie = Cubie::solved([0, -1, 1]);
    let model = puzzle_model(&cubie, Some((turn, FRAC_PI_2 / 2.)), &Celebration::new());

    assert!(close(model.transform_point(Point3::new(0., 0., 0.)), [0., -1., 1.]));
  }
}
