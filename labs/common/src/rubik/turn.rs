use std::f32::consts::FRAC_PI_2;

/// Rotation axis of a layer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
  X,
  Y,
  Z,
}

impl Axis {
  /// Component of a lattice position along this axis.
  pub fn component(self, v: [i8; 3]) -> i8 {
    match self {
      Axis::X => v[0],
      Axis::Y => v[1],
      Axis::Z => v[2],
    }
  }
}

/// Turning direction, seen from the positive end of the axis.
///
/// Counter-clockwise is a positive angle (right-hand rule).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
  CounterClockwise,
  Clockwise,
}

impl Direction {
  pub fn reversed(self) -> Self {
    match self {
      Direction::CounterClockwise => Direction::Clockwise,
      Direction::Clockwise => Direction::CounterClockwise,
    }
  }

  fn sign(self) -> f32 {
    match self {
      Direction::CounterClockwise => 1.,
      Direction::Clockwise => -1.,
    }
  }
}

/// A quarter-turn of one layer of the cube.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Turn {
  pub axis: Axis,
  /// Coordinate of the layer along the axis, in `-1..=1`.
  pub layer: i8,
  pub direction: Direction,
}

const fn turn(axis: Axis, layer: i8, direction: Direction) -> Turn {
  Turn {
    axis,
    layer,
    direction,
  }
}

impl Turn {
  /// Every distinct quarter-turn.
  #[rustfmt::skip]
  pub const ALL: [Turn; 18] = [
    turn(Axis::X, -1, Direction::CounterClockwise), turn(Axis::X, -1, Direction::Clockwise),
    turn(Axis::X,  0, Direction::CounterClockwise), turn(Axis::X,  0, Direction::Clockwise),
    turn(Axis::X,  1, Direction::CounterClockwise), turn(Axis::X,  1, Direction::Clockwise),
    turn(Axis::Y, -1, Direction::CounterClockwise), turn(Axis::Y, -1, Direction::Clockwise),
    turn(Axis::Y,  0, Direction::CounterClockwise), turn(Axis::Y,  0, Direction::Clockwise),
    turn(Axis::Y,  1, Direction::CounterClockwise), turn(Axis::Y,  1, Direction::Clockwise),
    turn(Axis::Z, -1, Direction::CounterClockwise), turn(Axis::Z, -1, Direction::Clockwise),
    turn(Axis::Z,  0, Direction::CounterClockwise), turn(Axis::Z,  0, Direction::Clockwise),
    turn(Axis::Z,  1, Direction::CounterClockwise), turn(Axis::Z,  1, Direction::Clockwise),
  ];

  pub const fn new(axis: Axis, layer: i8, direction: Direction) -> Self {
    turn(axis, layer, direction)
  }

  /// Keyboard layout of the turns.
  ///
  /// Each row of three keys drives the three layers of an axis; the row below turns them the other way.
  pub fn from_key(key: char) -> Option<Self> {
    use Direction::*;

    let t = match key.to_ascii_lowercase() {
      'q' => turn(Axis::Y, 1, CounterClockwise),
      'a' => turn(Axis::Y, 0, CounterClockwise),
      'z' => turn(Axis::Y, -1, CounterClockwise),
      'w' => turn(Axis::Y, 1, Clockwise),
      's' => turn(Axis::Y, 0, Clockwise),
      'x' => turn(Axis::Y, -1, Clockwise),

      'u' => turn(Axis::X, -1, CounterClockwise),
      'i' => turn(Axis::X, 0, CounterClockwise),
      'o' => turn(Axis::X, 1, CounterClockwise),
      'j' => turn(Axis::X, -1, Clockwise),
      'k' => turn(Axis::X, 0, Clockwise),
      'l' => turn(Axis::X, 1, Clockwise),

      'f' => turn(Axis::Z, 1, CounterClockwise),
      'g' => turn(Axis::Z, 0, CounterClockwise),
      'h' => turn(Axis::Z, -1, CounterClockwise),
      'v' => turn(Axis::Z, 1, Clockwise),
      'b' => turn(Axis::Z, 0, Clockwise),
      'n' => turn(Axis::Z, -1, Clockwise),

      _ => return None,
    };

    Some(t)
  }

  /// Whether a cubie at `position` belongs to the turning layer.
  pub fn contains(&self, position: [i8; 3]) -> bool {
    self.axis.component(position) == self.layer
  }

  /// The turn undoing this one.
  pub fn inverse(&self) -> Self {
    Turn {
      direction: self.direction.reversed(),
      ..*self
    }
  }

  /// Rotate a lattice vector by a quarter-turn around the axis.
  pub fn rotate(&self, [x, y, z]: [i8; 3]) -> [i8; 3] {
    match (self.axis, self.direction) {
      (Axis::X, Direction::CounterClockwise) => [x, -z, y],
      (Axis::X, Direction::Clockwise) => [x, z, -y],
      (Axis::Y, Direction::CounterClockwise) => [z, y, -x],
      (Axis::Y, Direction::Clockwise) => [-z, y, x],
      (Axis::Z, Direction::CounterClockwise) => [-y, x, z],
      (Axis::Z, Direction::Clockwise) => [y, -x, z],
    }
  }

  /// Angle of the layer after `progress` (in `0..=1`) of the turn, in radians.
  pub fn angle(&self, progress: f32) -> f32 {
    self.direction.sign() * FRAC_PI_2 * progress.clamp(0., 1.)
  }
}
