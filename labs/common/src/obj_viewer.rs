//! Phong-lit Wavefront OBJ model, fitted in the unit cube around the origin.
//!
//! The model is read from `model.obj`. The camera orbits it as in the lit cubes lab, lighting values are tuned
//! the same way, and the <main action> makes the model revolve.

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

use crate::{
  animation::FrameClock,
  camera::OrbitCamera,
  lighting::{LightingPanel, PALETTE},
  obj::{self, ObjModel},
  shared::{
    aspect_ratio, build_program, normal_matrix, vec3, PhongInterface, Semantics, Vertex, VertexIndex, CLEAR_COLOR,
    PHONG_FS, PHONG_VS,
  },
  Features, InputAction, Lab, LabError, LoopFeedback, PlatformServices,
};

pub const MODEL_NAME: &str = "model.obj";

/// Revolution speed, in radians per second.
const REVOLUTION_SPEED: f32 = 0.5;

/// Transform bringing the model's bounding box in the cube of side 2 centered on the origin.
pub fn fit_model(model: &ObjModel) -> Matrix4<f32> {
  let (lo, hi) = match model.bounds() {
    Some(bounds) => bounds,
    None => return Matrix4::from_scale(1.),
  };

  let center = Vector3::new(lo[0] + hi[0], lo[1] + hi[1], lo[2] + hi[2]) * 0.5;
  let extent = (0..3).map(|c| hi[c] - lo[c]).fold(0., f32::max);
  let scale = if extent > 0. { 2. / extent } else { 1. };

  Matrix4::from_scale(scale) * Matrix4::from_translation(-center)
}

pub struct LocalLab {
  program: Program<Semantics, (), PhongInterface>,
  mesh: Tess<Vertex, VertexIndex>,
  fit: Matrix4<f32>,
  revolving: bool,
  angle: f32,
  lighting: LightingPanel,
  camera: OrbitCamera,
  clock: FrameClock,
  aspect_ratio: f32,
}

impl Lab for LocalLab {
  fn features() -> Features {
    Features::none().model(MODEL_NAME)
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, LabError> {
    let program = build_program(context, PHONG_VS, PHONG_FS)?;

    let source = platform
      .fetch_model(MODEL_NAME)
      .map_err(|e| LabError::CannotFetchModel(Box::new(e)))?;
    let model = obj::parse(source)?;
    let (vertices, indices) = model.build_mesh(PALETTE[2].1);

    log::info!(
      "{}: {} triangles, {} vertices",
      MODEL_NAME,
      model.triangles.len(),
      vertices.len()
    );

    let mesh = context
      .new_tess()
      .set_vertices(vertices)
      .set_indices(indices)
      .set_mode(Mode::Triangle)
      .build()
      .map_err(|e| LabError::CannotCreateTess(Box::new(e)))?;

    Ok(Self {
      program,
      mesh,
      fit: fit_model(&model),
      revolving: false,
      angle: 0.,
      lighting: LightingPanel::default(),
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

        InputAction::MainToggle => self.revolving = !self.revolving,

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
    if self.revolving {
      self.angle += REVOLUTION_SPEED * dt;
    }

    let model = Matrix4::from_angle_y(Rad(self.angle)) * self.fit;
    let projection = Mat44::new(self.camera.projection(self.aspect_ratio));
    let view = Mat44::new(self.camera.view());
    let eye = vec3(self.camera.position().to_vec().into());
    let params = &self.lighting.params;
    let program = &mut self.program;
    let mesh = &self.mesh;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);
            iface.set(&uni.model, Mat44::new(model));
            iface.set(&uni.normal_matrix, Mat33::new(normal_matrix(&model)));
            iface.set(&uni.eye, eye);
            iface.set(&uni.light_position, vec3(params.light_position));
            iface.set(&uni.light_color, vec3(params.light_color));
            iface.set(&uni.ambient, vec3(params.ambient));
            iface.set(&uni.diffuse, vec3(params.diffuse));
            iface.set(&uni.specular, vec3(params.specular));
            iface.set(&uni.shininess, params.shininess);

            rdr_gate.render(&RenderState::default(), |mut tess_gate| tess_gate.render(mesh))
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
  use cgmath::{InnerSpace as _, Point3, Transform as _};

  #[test]
  fn model_is_fitted_around_the_origin() {
    let model = obj::parse("o box\nv 2 2 2\nv 6 4 3\nv 2 4 2\nf 1 2 3\n").unwrap();
    let fit = fit_model(&model);

    let lo = fit.transform_point(Point3::new(2., 2., 2.));
    let hi = fit.transform_point(Point3::new(6., 4., 3.));

    assert!((lo - Point3::new(-1., -0.5, -0.25)).magnitude() < 1e-5);
    assert!((hi - Point3::new(1., 0.5, 0.25)).magnitude() < 1e-5);
  }

  #[test]
  fn empty_model_is_left_alone() {
    assert_eq!(fit_model(&ObjModel::default()), Matrix4::from_scale(1.));
  }

  #[test]
  fn viewer_asks_for_its_model() {
    assert_eq!(LocalLab::features().models(), [MODEL_NAME.to_owned()]);
  }
}
