//! Phong lighting parameters.

use std::fmt;

use crate::{
  shared::{Rgba, BLACK},
  InputAction,
};

/// Named colors the lit cube face can be painted with.
pub const PALETTE: [(&str, Rgba); 6] = [
  ("Turquoise", [0.251, 0.878, 0.816, 1.]),
  ("Amethyst", [0.6, 0.4, 0.8, 1.]),
  ("Coral", [1., 0.498, 0.314, 1.]),
  ("Chartreuse", [0.498, 1., 0., 1.]),
  ("Periwinkle", [0.8, 0.8, 1., 1.]),
  ("Salmon", [0.98, 0.5, 0.447, 1.]),
];

/// Uniform values of the Phong shader.
#[derive(Clone, Debug, PartialEq)]
pub struct LightingParams {
  pub shininess: f32,
  pub ambient: [f32; 3],
  pub specular: [f32; 3],
  pub diffuse: [f32; 3],
  pub light_color: [f32; 3],
  pub light_position: [f32; 3],
}

impl Default for LightingParams {
  fn default() -> Self {
    LightingParams {
      shininess: 50.,
      ambient: [0.2, 0.3, 0.4],
      specular: [0.5; 3],
      diffuse: [0.3; 3],
      light_color: [1.; 3],
      light_position: [0., 2., 0.],
    }
  }
}

/// A single adjustable lighting scalar.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LightingParameter {
  Shininess,
  Ambient(usize),
  Specular(usize),
  Diffuse(usize),
  LightColor(usize),
}

impl LightingParameter {
  #[rustfmt::skip]
  pub const ALL: [LightingParameter; 13] = [
    LightingParameter::Shininess,
    LightingParameter::Ambient(0), LightingParameter::Ambient(1), LightingParameter::Ambient(2),
    LightingParameter::Specular(0), LightingParameter::Specular(1), LightingParameter::Specular(2),
    LightingParameter::Diffuse(0), LightingParameter::Diffuse(1), LightingParameter::Diffuse(2),
    LightingParameter::LightColor(0), LightingParameter::LightColor(1), LightingParameter::LightColor(2),
  ];

  fn position(self) -> usize {
    LightingParameter::ALL
      .iter()
      .position(|&p| p == self)
      .unwrap_or(0)
  }

  pub fn next(self) -> Self {
    LightingParameter::ALL[(self.position() + 1) % LightingParameter::ALL.len()]
  }

  pub fn previous(self) -> Self {
    let len = LightingParameter::ALL.len();
    LightingParameter::ALL[(self.position() + len - 1) % len]
  }

  /// Allowed range of the value.
  pub fn range(self) -> (f32, f32) {
    match self {
      LightingParameter::Shininess => (1., 200.),
      _ => (0., 1.),
    }
  }

  /// Amount a single increase / decrease changes the value by.
  pub fn step(self) -> f32 {
    match self {
      LightingParameter::Shininess => 5.,
      _ => 0.05,
    }
  }
}

impl fmt::Display for LightingParameter {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    const RGB: [&str; 3] = ["red", "green", "blue"];

    match *self {
      LightingParameter::Shininess => f.write_str("shininess"),
      LightingParameter::Ambient(i) => write!(f, "ambient {}", RGB[i % 3]),
      LightingParameter::Specular(i) => write!(f, "specular {}", RGB[i % 3]),
      LightingParameter::Diffuse(i) => write!(f, "diffuse {}", RGB[i % 3]),
      LightingParameter::LightColor(i) => write!(f, "light color {}", RGB[i % 3]),
    }
  }
}

impl LightingParams {
  fn slot(&mut self, param: LightingParameter) -> &mut f32 {
    match param {
      LightingParameter::Shininess => &mut self.shininess,
      LightingParameter::Ambient(i) => &mut self.ambient[i % 3],
      LightingParameter::Specular(i) => &mut self.specular[i % 3],
      LightingParameter::Diffuse(i) => &mut self.diffuse[i % 3],
      LightingParameter::LightColor(i) => &mut self.light_color[i % 3],
    }
  }

  pub fn get(&self, param: LightingParameter) -> f32 {
    match param {
      LightingParameter::Shininess => self.shininess,
      LightingParameter::Ambient(i) => self.ambient[i % 3],
      LightingParameter::Specular(i) => self.specular[i % 3],
      LightingParameter::Diffuse(i) => self.diffuse[i % 3],
      LightingParameter::LightColor(i) => self.light_color[i % 3],
    }
  }

  /// Change a value by `delta`, clamped to its range. Returns the new value.
  pub fn adjust(&mut self, param: LightingParameter, delta: f32) -> f32 {
    let (min, max) = param.range();
    let slot = self.slot(param);
    *slot = (*slot + delta).clamp(min, max);
    *slot
  }
}

/// Lighting values and the one currently selected for adjustment.
#[derive(Clone, Debug)]
pub struct LightingPanel {
  pub params: LightingParams,
  selected: LightingParameter,
}

impl Default for LightingPanel {
  fn default() -> Self {
    LightingPanel {
      params: LightingParams::default(),
      selected: LightingParameter::Shininess,
    }
  }
}

impl LightingPanel {
  pub fn selected(&self) -> LightingParameter {
    self.selected
  }

  /// React to an input action. Returns whether the action was used.
  pub fn handle(&mut self, action: &InputAction) -> bool {
    match *action {
      InputAction::NextParameter => self.selected = self.selected.next(),
      InputAction::PreviousParameter => self.selected = self.selected.previous(),
      InputAction::Increase => {
        self.params.adjust(self.selected, self.selected.step());
      }
      InputAction::Decrease => {
        self.params.adjust(self.selected, -self.selected.step());
      }
      _ => return false,
    }

    log::info!("{}: {}", self.selected, self.params.get(self.selected));
    true
  }
}

/// Color cycle of the painted face: black, then every [`PALETTE`] entry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PaletteCycle {
  current: Option<usize>,
}

impl PaletteCycle {
  pub fn next(&mut self) {
    self.current = match self.current {
      None => Some(0),
      Some(i) if i + 1 < PALETTE.len() => Some(i + 1),
      Some(_) => None,
    };
  }

  pub fn name(&self) -> &'static str {
    self.current.map_or("Black", |i| PALETTE[i].0)
  }

  pub fn color(&self) -> Rgba {
    self.current.map_or(BLACK, |i| PALETTE[i].1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parameters_cycle_both_ways() {
    let mut p = LightingParameter::Shininess;

    for _ in 0..13 {
      p = p.next();
    }
    assert_eq!(p, LightingParameter::Shininess);

    assert_eq!(p.previous(), LightingParameter::LightColor(2));
    assert_eq!(p.next(), LightingParameter::Ambient(0));
  }

  #[test]
  fn adjust_clamps_to_range() {
    let mut params = LightingParams::default();

    assert_eq!(params.adjust(LightingParameter::Shininess, 1000.), 200.);
    assert_eq!(params.adjust(LightingParameter::Shininess, -1000.), 1.);
    assert_eq!(params.adjust(LightingParameter::Diffuse(1), -1.), 0.);
    assert_eq!(params.adjust(LightingParameter::LightColor(0), 0.5), 1.);
    assert!((params.adjust(LightingParameter::Ambient(2), 0.1) - 0.5).abs() < 1e-6);

    assert_eq!(params.diffuse, [0.3, 0., 0.3]);
    assert!((params.get(LightingParameter::Ambient(2)) - 0.5).abs() < 1e-6);
  }

  #[test]
  fn parameter_names() {
    assert_eq!(LightingParameter::Specular(1).to_string(), "specular green");
    assert_eq!(LightingParameter::Shininess.to_string(), "shininess");
  }

  #[test]
  fn panel_adjusts_selected_parameter() {
    let mut panel = LightingPanel::default();

    assert!(panel.handle(&InputAction::Increase));
    assert_eq!(panel.params.shininess, 55.);

    panel.handle(&InputAction::PreviousParameter);
    assert_eq!(panel.selected(), LightingParameter::LightColor(2));
    panel.handle(&InputAction::Increase);
    assert_eq!(panel.params.light_color[2], 1.);

    panel.handle(&InputAction::NextParameter);
    panel.handle(&InputAction::NextParameter);
    panel.handle(&InputAction::Decrease);
    assert!((panel.params.ambient[0] - 0.15).abs() < 1e-6);

    assert!(!panel.handle(&InputAction::MainToggle));
  }

  #[test]
  fn palette_cycle_wraps_to_black() {
    let mut cycle = PaletteCycle::default();
    assert_eq!(cycle.color(), BLACK);

    cycle.next();
    assert_eq!(cycle.name(), "Turquoise");

    for _ in 0..PALETTE.len() {
      cycle.next();
    }

    assert_eq!(cycle.name(), "Black");
  }
}
