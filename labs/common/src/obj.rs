//! Wavefront OBJ models.
//!
//! Parsing is done by [`wavefront_obj`]; only the geometry is kept. Every object of the file ends up in the same
//! [`ObjModel`], polygons already triangulated. Points, lines, texture coordinates and materials are dropped.

use cgmath::{InnerSpace as _, Vector3};
use std::{collections::HashMap, error::Error, fmt};
use wavefront_obj::{
  obj::{self, Primitive, VTNIndex},
  ParseError,
};

use crate::shared::{Rgba, Vertex, VertexIndex};

/// A triangle corner, as indices into the model's positions and normals.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Corner {
  pub position: usize,
  pub normal: Option<usize>,
}

/// Triangulated geometry of an OBJ file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjModel {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub triangles: Vec<[Corner; 3]>,
}

#[derive(Debug)]
pub enum ObjError {
  /// The file is not valid OBJ.
  Parse { line: usize, message: String },
  /// A face of an object references a position or normal the object doesn't have.
  IndexOutOfRange { object: String, index: usize },
}

impl fmt::Display for ObjError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ObjError::Parse { line, ref message } => write!(f, "line {}: {}", line, message),
      ObjError::IndexOutOfRange { ref object, index } => {
        write!(f, "object {}: index out of range: {}", object, index)
      }
    }
  }
}

impl Error for ObjError {}

impl From<ParseError> for ObjError {
  fn from(e: ParseError) -> Self {
    ObjError::Parse {
      line: e.line_number,
      message: e.message,
    }
  }
}

pub fn parse(source: &str) -> Result<ObjModel, ObjError> {
  let obj_set = obj::parse(source.to_owned())?;
  let mut model = ObjModel::default();

  for object in &obj_set.objects {
    // indices are local to each object
    let position_offset = model.positions.len();
    let normal_offset = model.normals.len();

    model
      .positions
      .extend(object.vertices.iter().map(|v| [v.x as f32, v.y as f32, v.z as f32]));
    model
      .normals
      .extend(object.normals.iter().map(|n| [n.x as f32, n.y as f32, n.z as f32]));

    let corner = |(v, _, n): VTNIndex| {
      let out_of_range = |index| ObjError::IndexOutOfRange {
        object: object.name.clone(),
        index,
      };

      if v >= object.vertices.len() {
        return Err(out_of_range(v));
      }

      let normal = match n {
        Some(n) if n >= object.normals.len() => return Err(out_of_range(n)),
        Some(n) => Some(normal_offset + n),
        None => None,
      };

      Ok(Corner {
        position: position_offset + v,
        normal,
      })
    };

    for shape in object.geometry.iter().flat_map(|geometry| &geometry.shapes) {
      if let Primitive::Triangle(a, b, c) = shape.primitive {
        model.triangles.push([corner(a)?, corner(b)?, corner(c)?]);
      }
    }
  }

  Ok(model)
}

impl ObjModel {
  /// Axis-aligned bounding box of the positions.
  pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
    let first = *self.positions.first()?;

    Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
      for c in 0..3 {
        lo[c] = lo[c].min(p[c]);
        hi[c] = hi[c].max(p[c]);
      }

      (lo, hi)
    }))
  }

  /// Indexed triangle mesh of the model, painted with a single color.
  ///
  /// Corners without normals get the flat normal of their triangle. Corners sharing both position and normal share
  /// a vertex.
  pub fn build_mesh(&self, color: Rgba) -> (Vec<Vertex>, Vec<VertexIndex>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(self.triangles.len() * 3);
    let mut seen: HashMap<[u32; 6], VertexIndex> = HashMap::new();

    for triangle in &self.triangles {
      let [a, b, c] = triangle.map(|corner| self.positions[corner.position]);
      let flat = flat_normal(a, b, c);

      for corner in triangle {
        let position = self.positions[corner.position];
        let normal = corner.normal.map_or(flat, |n| self.normals[n]);

        let mut key = [0; 6];
        for (k, x) in key.iter_mut().zip(position.iter().chain(normal.iter())) {
          *k = x.to_bits();
        }

        let index = *seen.entry(key).or_insert_with(|| {
          vertices.push(Vertex::colored(position, color, normal));
          (vertices.len() - 1) as VertexIndex
        });

        indices.push(index);
      }
    }

    (vertices, indices)
  }
}

fn flat_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
  let (a, b, c) = (Vector3::from(a), Vector3::from(b), Vector3::from(c));
  let n = (b - a).cross(c - a);

  if n.magnitude2() > f32::EPSILON {
    n.normalize().into()
  } else {
    [0., 0., 1.]
  }
}
