//! Vertex types, geometry builders and shader helpers shared by the labs.

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix as _};
use luminance::{Semantics, UniformInterface, Vertex};
use luminance_front::{
  context::GraphicsContext,
  shader::{
    types::{Mat33, Mat44, Vec3},
    BuiltProgram, Program, Uniform,
  },
  Backend,
};

use crate::LabError;

/// Untransformed positions, vertex colors.
pub const FLAT_VS: &str = include_str!("flat-vs.glsl");
pub const FLAT_FS: &str = include_str!("flat-fs.glsl");

/// Model / view / projection transformed positions, vertex colors.
pub const MVP_VS: &str = include_str!("mvp-vs.glsl");

/// Phong shading of vertex colors with a single point light.
pub const PHONG_VS: &str = include_str!("phong-vs.glsl");
pub const PHONG_FS: &str = include_str!("phong-fs.glsl");

#[derive(Clone, Copy, Debug, Eq, PartialEq, Semantics)]
pub enum Semantics {
  // reference vertex positions with the position variable in vertex shaders
  #[sem(name = "position", repr = "[f32; 3]", wrapper = "VertexPosition")]
  Position,
  // reference vertex colors with the color variable in vertex shaders
  #[sem(name = "color", repr = "[f32; 4]", wrapper = "VertexColor")]
  Color,
  // reference vertex normals with the normal variable in vertex shaders
  #[sem(name = "normal", repr = "[f32; 3]", wrapper = "VertexNormal")]
  Normal,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct Vertex {
  pub position: VertexPosition,
  pub color: VertexColor,
  pub normal: VertexNormal,
}

/// Index type used by every indexed tessellation of the labs.
pub type VertexIndex = u32;

/// RGBA color.
pub type Rgba = [f32; 4];

pub const BLACK: Rgba = [0., 0., 0., 1.];

/// Background color of the 3D labs.
pub const CLEAR_COLOR: Rgba = [1., 1., 1., 1.];

// corners of each face, counter-clockwise when looking at the face from outside, followed by the outward normal
#[rustfmt::skip]
const CUBE_FACES: [([[f32; 3]; 4], [f32; 3]); 6] = [
  // up
  ([[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]], [ 0.,  1.,  0.]),
  // down
  ([[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]], [ 0., -1.,  0.]),
  // left
  ([[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]], [-1.,  0.,  0.]),
  // right
  ([[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]], [ 1.,  0.,  0.]),
  // front
  ([[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]], [ 0.,  0.,  1.]),
  // back
  ([[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]], [ 0.,  0., -1.]),
];

impl Vertex {
  pub fn colored(position: [f32; 3], color: Rgba, normal: [f32; 3]) -> Self {
    Vertex::new(
      VertexPosition::new(position),
      VertexColor::new(color),
      VertexNormal::new(normal),
    )
  }
}

/// Unit cube centered on the origin with one color per face.
///
/// Faces come in the order of [`Face`](crate::rubik::Face): up (+Y), down (−Y), left (−X), right (+X), front (+Z) and
/// back (−Z).
pub fn cube(face_colors: [Rgba; 6]) -> ([Vertex; 24], [VertexIndex; 36]) {
  let mut vertices = [Vertex::colored([0.; 3], BLACK, [0.; 3]); 24];
  let mut indices = [0; 36];

  for (face, ((corners, normal), color)) in CUBE_FACES.iter().zip(face_colors).enumerate() {
    for (corner, position) in corners.iter().enumerate() {
      vertices[face * 4 + corner] = Vertex::colored(*position, color, *normal);
    }

    let base = face as VertexIndex * 4;
    indices[face * 6..face * 6 + 6].copy_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
  }

  (vertices, indices)
}

/// Recolor the faces of vertices produced by [`cube`].
pub fn recolor_cube(vertices: &mut [Vertex], face_colors: [Rgba; 6]) {
  for (face, color) in face_colors.iter().enumerate() {
    for vertex in &mut vertices[face * 4..face * 4 + 4] {
      vertex.color = VertexColor::new(*color);
    }
  }
}

/// A 1×2 panel facing +Z.
#[rustfmt::skip]
pub fn rectangle(color: Rgba) -> ([Vertex; 4], [VertexIndex; 6]) {
  let normal = [0., 0., 1.];
  let vertices = [
    Vertex::colored([-0.5,  1., 0.], color, normal),
    Vertex::colored([-0.5, -1., 0.], color, normal),
    Vertex::colored([ 0.5, -1., 0.], color, normal),
    Vertex::colored([ 0.5,  1., 0.], color, normal),
  ];

  (vertices, [0, 1, 2, 0, 2, 3])
}

#[derive(Debug, UniformInterface)]
pub struct MvpInterface {
  #[uniform(unbound)]
  pub projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub model: Uniform<Mat44<f32>>,
}

#[derive(Debug, UniformInterface)]
pub struct PhongInterface {
  #[uniform(unbound)]
  pub projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub model: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub normal_matrix: Uniform<Mat33<f32>>,
  // camera position, for specular highlights
  #[uniform(unbound)]
  pub eye: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub light_position: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub light_color: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub ambient: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub diffuse: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub specular: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  pub shininess: Uniform<f32>,
}

pub fn vec3([x, y, z]: [f32; 3]) -> Vec3<f32> {
  Vec3::new(x, y, z)
}

/// Width over height of a framebuffer, 1 for degenerate sizes.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
  if width == 0 || height == 0 {
    1.
  } else {
    width as f32 / height as f32
  }
}

/// Compile a vertex / fragment shader pair, logging every warning the backend reports.
pub fn build_program<Uni>(
  context: &mut impl GraphicsContext<Backend = Backend>,
  vs: &str,
  fs: &str,
) -> Result<Program<Semantics, (), Uni>, LabError>
where
  Uni: luminance::shader::UniformInterface<Backend>,
{
  let BuiltProgram { program, warnings } = context
    .new_shader_program::<Semantics, (), Uni>()
    .from_strings(vs, None, None, fs)
    .map_err(|e| LabError::CannotCreateProgram(Box::new(e)))?;

  for warning in warnings {
    log::warn!("{}", warning);
  }

  Ok(program)
}

/// Matrix used to bring normals to world space: inverse-transpose of the upper 3×3 part of the model matrix.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
  let upper = Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate());
  upper
    .invert()
    .map(|inverse| inverse.transpose())
    .unwrap_or_else(Matrix3::identity)
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{InnerSpace as _, SquareMatrix as _, Vector3};

  const COLORS: [Rgba; 6] = [
    [1., 0., 0., 1.],
    [0., 1., 0., 1.],
    [0., 0., 1., 1.],
    [1., 1., 0., 1.],
    [0., 1., 1., 1.],
    [1., 0., 1., 1.],
  ];

  fn v3(a: [f32; 3]) -> Vector3<f32> {
    Vector3::new(a[0], a[1], a[2])
  }

  #[test]
  fn cube_faces_are_wound_counter_clockwise_from_outside() {
    let (vertices, indices) = cube(COLORS);

    for triangle in indices.chunks(3) {
      let [a, b, c] = [0, 1, 2].map(|i| vertices[triangle[i] as usize]);
      let winding = (v3(*b.position) - v3(*a.position)).cross(v3(*c.position) - v3(*a.position));
      let normal = v3(*a.normal);

      assert!(winding.normalize().dot(normal) > 0.99);
    }
  }

  #[test]
  fn cube_faces_carry_their_color() {
    let (vertices, _) = cube(COLORS);

    for (face, color) in COLORS.iter().enumerate() {
      for vertex in &vertices[face * 4..face * 4 + 4] {
        assert_eq!(*vertex.color, *color);
      }
    }
  }

  #[test]
  fn cube_faces_follow_face_order() {
    use crate::rubik::Face;

    let (vertices, _) = cube(COLORS);

    for face in Face::ALL {
      let [x, y, z] = face.normal();
      let normal = [f32::from(x), f32::from(y), f32::from(z)];
      let mut painted = vertices.iter().filter(|v| *v.normal == normal);

      assert!(painted.clone().count() == 4, "{:?}", face);
      assert!(painted.all(|v| *v.color == COLORS[face.index()]), "{:?}", face);
    }
  }

  #[test]
  fn recolor_cube_only_touches_colors() {
    let (mut vertices, _) = cube(COLORS);
    let (original, _) = cube(COLORS);
    recolor_cube(&mut vertices, [BLACK; 6]);

    for (recolored, original) in vertices.iter().zip(original.iter()) {
      assert_eq!(*recolored.color, BLACK);
      assert_eq!(*recolored.position, *original.position);
    }
  }

  #[test]
  fn normal_matrix_of_uniform_scale_keeps_directions() {
    let model = Matrix4::from_translation(Vector3::new(3., -2., 1.)) * Matrix4::from_scale(2.);
    let normal = normal_matrix(&model) * Vector3::new(0., 1., 0.);

    assert!(normal.normalize().dot(Vector3::new(0., 1., 0.)) > 0.999);
  }

  #[test]
  fn aspect_ratio_of_empty_framebuffer() {
    assert_eq!(aspect_ratio(1200, 600), 2.);
    assert_eq!(aspect_ratio(0, 600), 1.);
  }

  #[test]
  fn normal_matrix_of_singular_model_is_identity() {
    let model = Matrix4::from_scale(0.);
    assert_eq!(normal_matrix(&model), Matrix3::identity());
  }
}
