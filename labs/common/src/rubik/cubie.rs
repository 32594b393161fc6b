use crate::shared::Rgba;

use super::turn::Turn;

/// A face of a cubie, named after the outward direction it points at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Face {
  Up,
  Down,
  Left,
  Right,
  Front,
  Back,
}

impl Face {
  /// Faces in the order face colors are stored, which is the order of the cube geometry.
  pub const ALL: [Face; 6] = [
    Face::Up,
    Face::Down,
    Face::Left,
    Face::Right,
    Face::Front,
    Face::Back,
  ];

  pub fn index(self) -> usize {
    self as usize
  }

  pub fn normal(self) -> [i8; 3] {
    match self {
      Face::Up => [0, 1, 0],
      Face::Down => [0, -1, 0],
      Face::Left => [-1, 0, 0],
      Face::Right => [1, 0, 0],
      Face::Front => [0, 0, 1],
      Face::Back => [0, 0, -1],
    }
  }

  pub fn from_normal(normal: [i8; 3]) -> Option<Self> {
    Face::ALL.iter().copied().find(|face| face.normal() == normal)
  }

  /// Color of this face on a solved cube.
  pub fn home_color(self) -> Color {
    match self {
      Face::Up => Color::White,
      Face::Down => Color::Yellow,
      Face::Left => Color::Green,
      Face::Right => Color::Blue,
      Face::Front => Color::Red,
      Face::Back => Color::Orange,
    }
  }
}

/// Sticker color.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
  White,
  Red,
  Green,
  Yellow,
  Orange,
  Blue,
  /// Faces hidden inside the cube.
  Black,
}

impl Color {
  pub fn rgba(self) -> Rgba {
    match self {
      Color::White => [0.95, 0.95, 0.95, 1.],
      Color::Red => [1., 0., 0., 1.],
      Color::Green => [0., 1., 0., 1.],
      Color::Yellow => [1., 1., 0., 1.],
      Color::Orange => [1., 0.6, 0., 1.],
      Color::Blue => [0.3, 0.52, 0.91, 1.],
      Color::Black => [0., 0., 0., 1.],
    }
  }
}

/// One of the 27 unit cubes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cubie {
  /// Lattice position, each coordinate in `-1..=1`.
  pub position: [i8; 3],
  /// Colors indexed by [`Face::index`].
  pub faces: [Color; 6],
}

impl Cubie {
  /// Cubie of a solved cube at `position`.
  pub fn solved(position: [i8; 3]) -> Self {
    let mut faces = [Color::Black; 6];

    for face in Face::ALL {
      if dot(face.normal(), position) == 1 {
        faces[face.index()] = face.home_color();
      }
    }

    Cubie { position, faces }
  }

  pub fn color(&self, face: Face) -> Color {
    self.faces[face.index()]
  }

  /// Whether `face` lies on the outside of the cube.
  pub fn is_outer(&self, face: Face) -> bool {
    dot(face.normal(), self.position) == 1
  }

  pub fn face_colors(&self) -> [Rgba; 6] {
    self.faces.map(Color::rgba)
  }

  /// Move the cubie along with its layer.
  ///
  /// The face now pointing at `d` shows the color that pointed at `R⁻¹·d` before the turn.
  pub(crate) fn turn(&mut self, turn: &Turn) {
    let inverse = turn.inverse();
    let old = self.faces;

    self.position = turn.rotate(self.position);

    for face in Face::ALL {
      // a quarter-turn maps unit normals onto unit normals
      if let Some(source) = Face::from_normal(inverse.rotate(face.normal())) {
        self.faces[face.index()] = old[source.index()];
      }
    }
  }
}

fn dot(a: [i8; 3], b: [i8; 3]) -> i8 {
  a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rubik::turn::{Axis, Direction};

  #[test]
  fn normals_round_trip_through_faces() {
    for face in Face::ALL {
      assert_eq!(Face::from_normal(face.normal()), Some(face));
    }

    assert_eq!(Face::from_normal([1, 1, 0]), None);
  }

  #[test]
  fn solved_corner_shows_three_colors() {
    let corner = Cubie::solved([1, 1, 1]);

    assert_eq!(corner.color(Face::Up), Color::White);
    assert_eq!(corner.color(Face::Right), Color::Blue);
    assert_eq!(corner.color(Face::Front), Color::Red);
    assert_eq!(corner.color(Face::Down), Color::Black);
    assert_eq!(corner.color(Face::Left), Color::Black);
    assert_eq!(corner.color(Face::Back), Color::Black);
  }

  #[test]
  fn core_is_black() {
    assert_eq!(Cubie::solved([0, 0, 0]).faces, [Color::Black; 6]);
  }

  #[test]
  fn top_turn_carries_front_sticker_to_right() {
    // counter-clockwise around +Y sends +Z to +X
    let mut cubie = Cubie::solved([0, 1, 1]);
    cubie.turn(&Turn::new(Axis::Y, 1, Direction::CounterClockwise));

    assert_eq!(cubie.position, [1, 1, 0]);
    assert_eq!(cubie.color(Face::Right), Color::Red);
    assert_eq!(cubie.color(Face::Up), Color::White);
    assert_eq!(cubie.color(Face::Front), Color::Black);
  }

  #[test]
  fn stickers_stay_on_the_outside() {
    let mut cubie = Cubie::solved([-1, 1, 1]);

    for t in Turn::ALL {
      if !t.contains(cubie.position) {
        continue;
      }

      cubie.turn(&t);

      for face in Face::ALL {
        assert_eq!(cubie.color(face) != Color::Black, cubie.is_outer(face));
      }
    }
  }
}
