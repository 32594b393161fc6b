//! A cube drawn in isometric projection straight in clip space: three rhombi, one per visible face.
//!
//! Press the <main action> to show or hide the sticker grid drawn over the faces.

use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::PipelineState,
  render_state::RenderState,
  shader::Program,
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

use crate::{
  rubik::Color,
  shared::{build_program, Rgba, Semantics, Vertex, VertexIndex, BLACK, CLEAR_COLOR, FLAT_FS, FLAT_VS},
  InputAction, Lab, LabError, LoopFeedback, PlatformServices,
};

// the front corner of the cube and the three edges leaving it, in clip space
const ORIGIN: [f32; 2] = [0., 0.25];
const EDGE_LEFT: [f32; 2] = [-2. / 2.8, 1. / 2.1 - 0.25];
const EDGE_RIGHT: [f32; 2] = [2. / 2.8, 1. / 2.1 - 0.25];
const EDGE_DOWN: [f32; 2] = [0., -2. / 3. - 0.25];

/// Stickers per face edge.
const GRID: usize = 3;

// a visible face, as two edges leaving the origin and a color
fn faces() -> [([f32; 2], [f32; 2], Rgba); 3] {
  [
    (EDGE_LEFT, EDGE_RIGHT, Color::White.rgba()),
    (EDGE_DOWN, EDGE_LEFT, Color::Red.rgba()),
    (EDGE_RIGHT, EDGE_DOWN, Color::Blue.rgba()),
  ]
}

fn point(u: [f32; 2], a: f32, v: [f32; 2], b: f32) -> [f32; 3] {
  [
    ORIGIN[0] + u[0] * a + v[0] * b,
    ORIGIN[1] + u[1] * a + v[1] * b,
    0.,
  ]
}

/// The three rhombi.
pub fn rhombi() -> (Vec<Vertex>, Vec<VertexIndex>) {
  let normal = [0., 0., 1.];
  let mut vertices = Vec::with_capacity(12);
  let mut indices = Vec::with_capacity(18);

  for (u, v, color) in faces() {
    let base = vertices.len() as VertexIndex;

    for (a, b) in [(0., 0.), (1., 0.), (1., 1.), (0., 1.)] {
      vertices.push(Vertex::colored(point(u, a, v, b), color, normal));
    }

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
  }

  (vertices, indices)
}

/// Line segments splitting each face in `GRID`×`GRID` stickers, borders included.
pub fn sticker_grid() -> Vec<Vertex> {
  let normal = [0., 0., 1.];
  let mut vertices = Vec::new();

  for (u, v, _) in faces() {
    for k in 0..=GRID {
      let t = k as f32 / GRID as f32;

      vertices.push(Vertex::colored(point(u, t, v, 0.), BLACK, normal));
      vertices.push(Vertex::colored(point(u, t, v, 1.), BLACK, normal));
      vertices.push(Vertex::colored(point(u, 0., v, t), BLACK, normal));
      vertices.push(Vertex::colored(point(u, 1., v, t), BLACK, normal));
    }
  }

  vertices
}

pub struct LocalLab {
  program: Program<Semantics, (), ()>,
  faces: Tess<Vertex, VertexIndex>,
  grid: Tess<Vertex>,
  show_grid: bool,
}

impl Lab for LocalLab {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError> {
    let program = build_program(context, FLAT_VS, FLAT_FS)?;

    let (vertices, indices) = rhombi();
    let faces = context
      .new_tess()
      .set_vertices(vertices)
      .set_indices(indices)
      .set_mode(Mode::Triangle)
      .build()
      .map_err(|e| LabError::CannotCreateTess(Box::new(e)))?;

    let grid = context
      .new_tess()
      .set_vertices(sticker_grid())
      .set_mode(Mode::Line)
      .build()
      .map_err(|e| LabError::CannotCreateTess(Box::new(e)))?;

    Ok(Self {
      program,
      faces,
      grid,
      show_grid: true,
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::MainToggle => {
          self.show_grid = !self.show_grid;
          log::info!("sticker grid: {}", if self.show_grid { "on" } else { "off" });
        }

        _ => (),
      }
    }

    let program = &mut self.program;
    let faces = &self.faces;
    let grid = &self.grid;
    let show_grid = self.show_grid;

    // everything lies in the z = 0 plane; draw order decides what is on top
    let render_st = RenderState::default().set_depth_test(None);

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |_, mut shd_gate| {
          shd_gate.shade(program, |_, _, mut rdr_gate| {
            rdr_gate.render(&render_st, |mut tess_gate| {
              let rendered = tess_gate.render(faces);

              if show_grid && rendered.is_ok() {
                tess_gate.render(grid)
              } else {
                rendered
              }
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

  #[test]
  fn rhombi_meet_at_the_front_corner() {
    let (vertices, indices) = rhombi();

    assert_eq!(vertices.len(), 12);
    assert_eq!(indices.len(), 18);

    for face in vertices.chunks(4) {
      assert_eq!(*face[0].position, [ORIGIN[0], ORIGIN[1], 0.]);
    }
  }

  #[test]
  fn adjacent_faces_share_edges() {
    let (vertices, _) = rhombi();
    let corners: Vec<_> = vertices.iter().map(|v| *v.position).collect();

    // top / left, top / right and left / right
    assert_eq!(corners[1], corners[7]);
    assert_eq!(corners[3], corners[9]);
    assert_eq!(corners[5], corners[11]);
  }

  #[test]
  fn grid_has_borders_and_inner_lines() {
    let grid = sticker_grid();

    // 3 faces, 4 positions per direction, 2 directions, 2 vertices per line
    assert_eq!(grid.len(), 3 * 4 * 2 * 2);
    assert!(grid.iter().all(|v| *v.color == BLACK));
  }
}
