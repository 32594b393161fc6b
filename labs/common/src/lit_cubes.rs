//! Phong-lit scene: a pulsing cube, a small cube revolving around it and a panel behind them.
//!
//! The camera orbits the scene with the <left>, <right>, <up> and <down> actions; <forward>, <backward> and
//! scrolling change its distance.
//!
//! Lighting values are tuned at runtime: <next parameter> and <previous parameter> select a value, <increase>
//! and <decrease> change it. The <auxiliary action> repaints the left face of the center cube with the next
//! palette color and the <main action> pauses the animation.

use cgmath::{EuclideanSpace as _, Matrix4, Rad, Vector3};
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::PipelineState,
  render_state::RenderState,
  shader::{
    types::{Mat33, Mat44},
    Program,
  },
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};
use std::f32::consts::FRAC_PI_4;

use crate::{
  animation::{Arrangement, FrameClock},
  camera::OrbitCamera,
  lighting::{LightingPanel, PaletteCycle, PALETTE},
  rubik::Face,
  shared::{
    aspect_ratio, build_program, cube, normal_matrix, recolor_cube, rectangle, vec3, PhongInterface, Rgba, Semantics,
    Vertex, VertexIndex, BLACK, CLEAR_COLOR, PHONG_FS, PHONG_VS,
  },
  InputAction, Lab, LabError, LoopFeedback, PlatformServices,
};

const DIAMOND_SCALE: f32 = 0.25;
const PANEL_COLOR: Rgba = [0.6, 0.6, 0.6, 1.];

/// Face colors of the center cube, the left one taken from the palette cycle.
pub fn center_colors(left: Rgba) -> [Rgba; 6] {
  let mut colors = [
    PALETTE[0].1,
    PALETTE[1].1,
    BLACK,
    PALETTE[2].1,
    PALETTE[3].1,
    PALETTE[4].1,
  ];
  colors[Face::Left.index()] = left;
  colors
}

pub fn center_model(arrangement: &Arrangement) -> Matrix4<f32> {
  Matrix4::from_scale(arrangement.center_scale())
}

/// The small cube stands on a corner, spins around its own vertical axis and revolves around the scene.
pub fn diamond_model(arrangement: &Arrangement) -> Matrix4<f32> {
  Matrix4::from_angle_y(Rad(arrangement.global_revolution()))
    * Matrix4::from_translation(Vector3::new(1., 1., 0.))
    * Matrix4::from_angle_y(Rad(arrangement.own_revolution()))
    * Matrix4::from_angle_z(Rad(FRAC_PI_4))
    * Matrix4::from_angle_x(Rad(FRAC_PI_4))
    * Matrix4::from_scale(DIAMOND_SCALE)
}

pub fn panel_model() -> Matrix4<f32> {
  Matrix4::from_translation(Vector3::new(0., 0., -2.5)) * Matrix4::from_scale(2.)
}

fn build_tess(
  context: &mut impl GraphicsContext<Backend = Backend>,
  vertices: &[Vertex],
  indices: &[VertexIndex],
) -> Result<Tess<Vertex, VertexIndex>, LabError> {
  context
    .new_tess()
    .set_vertices(vertices)
    .set_indices(indices)
    .set_mode(Mode::Triangle)
    .build()
    .map_err(|e| LabError::CannotCreateTess(Box::new(e)))
}

pub struct LocalLab {
  program: Program<Semantics, (), PhongInterface>,
  center: Tess<Vertex, VertexIndex>,
  diamond: Tess<Vertex, VertexIndex>,
  panel: Tess<Vertex, VertexIndex>,
  arrangement: Arrangement,
  lighting: LightingPanel,
  left_face: PaletteCycle,
  camera: OrbitCamera,
  clock: FrameClock,
  aspect_ratio: f32,
}

impl Lab for LocalLab {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError> {
    let program = build_program(context, PHONG_VS, PHONG_FS)?;
    let left_face = PaletteCycle::default();

    let (vertices, indices) = cube(center_colors(left_face.color()));
    let center = build_tess(context, &vertices, &indices)?;

    let (vertices, indices) = cube([PALETTE[5].1; 6]);
    let diamond = build_tess(context, &vertices, &indices)?;

    let (vertices, indices) = rectangle(PANEL_COLOR);
    let panel = build_tess(context, &vertices, &indices)?;

    Ok(Self {
      program,
      center,
      diamond,
      panel,
      arrangement: Arrangement::new(),
      lighting: LightingPanel::default(),
      left_face,
      camera: OrbitCamera::new(),
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

        InputAction::MainToggle => self.arrangement.toggle(),

        InputAction::AuxiliaryToggle => {
          self.left_face.next();
          log::info!("left face: {}", self.left_face.name());

          match self.center.vertices_mut() {
            Ok(mut vertices) => recolor_cube(&mut vertices, center_colors(self.left_face.color())),
            Err(e) => log::error!("cannot repaint the center cube: {}", e),
          }
        }

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        action => {
          if !self.lighting.handle(&action) {
            self.camera.handle(&action);
          }
        }
      }
    }

    let dt = self.clock.delta(t);
    self.arrangement.advance(dt);

    let scene = [
      (center_model(&self.arrangement), &self.center),
      (diamond_model(&self.arrangement), &self.diamond),
      (panel_model(), &self.panel),
    ];

    let projection = Mat44::new(self.camera.projection(self.aspect_ratio));
    let view = Mat44::new(self.camera.view());
    let eye = vec3(self.camera.position().to_vec().into());
    let params = &self.lighting.params;
    let program = &mut self.program;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);
            iface.set(&uni.eye, eye);
            iface.set(&uni.light_position, vec3(params.light_position));
            iface.set(&uni.light_color, vec3(params.light_color));
            iface.set(&uni.ambient, vec3(params.ambient));
            iface.set(&uni.diffuse, vec3(params.diffuse));
            iface.set(&uni.specular, vec3(params.specular));
            iface.set(&uni.shininess, params.shininess);

            scene.iter().try_for_each(|(model, tess)| {
              iface.set(&uni.model, Mat44::new(*model));
              iface.set(&uni.normal_matrix, Mat33::new(normal_matrix(model)));
              rdr_gate.render(&RenderState::default(), |mut tess_gate| tess_gate.render(*tess))
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
