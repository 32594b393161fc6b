//! Time-driven animation models.
//!
//! Both models only move while enabled; time is accumulated from the frame deltas they are fed so that pausing
//! and resuming does not make them jump.

/// Scale of a cubie at rest. The gap between cubies shows the layers.
pub const CUBIE_SCALE: f32 = 0.96;

/// Pulse and spin of a solved Rubik's cube.
#[derive(Clone, Debug, PartialEq)]
pub struct Celebration {
  enabled: bool,
  time: f32,
  scale: f32,
  spin: f32,
}

impl Default for Celebration {
  fn default() -> Self {
    Celebration {
      enabled: false,
      time: 0.,
      scale: CUBIE_SCALE,
      spin: 0.,
    }
  }
}

impl Celebration {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn enable(&mut self) {
    self.enabled = true;
  }

  /// Pause or resume, keeping the current scale and spin.
  pub fn toggle(&mut self) {
    self.enabled = !self.enabled;
  }

  pub fn advance(&mut self, dt: f32) {
    if !self.enabled {
      return;
    }

    self.time += dt;
    self.scale = 1. + 0.2 * (3. * self.time).sin();
    self.spin = self.time;
  }

  /// Stop and go back to rest.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn scale(&self) -> f32 {
    self.scale
  }

  /// Rotation of the whole cube, in radians.
  pub fn spin(&self) -> f32 {
    self.spin
  }
}

/// Motion of the lit scene: pulsing center cube and a small cube revolving around it.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement {
  enabled: bool,
  time: f32,
}

impl Default for Arrangement {
  fn default() -> Self {
    Arrangement {
      enabled: true,
      time: 0.,
    }
  }
}

impl Arrangement {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn toggle(&mut self) {
    self.enabled = !self.enabled;
  }

  pub fn advance(&mut self, dt: f32) {
    if self.enabled {
      self.time += dt;
    }
  }

  pub fn center_scale(&self) -> f32 {
    1. + 0.2 * (1.5 * self.time).sin()
  }

  /// Angle of the small cube around its own axis, in radians.
  pub fn own_revolution(&self) -> f32 {
    10. * self.time
  }

  /// Angle of the small cube around the scene, in radians.
  pub fn global_revolution(&self) -> f32 {
    -self.time
  }
}

/// Frame delta tracking from absolute times.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
  last: Option<f32>,
}

impl FrameClock {
  /// Seconds since the previous call, zero on the first call.
  pub fn delta(&mut self, now: f32) -> f32 {
    let dt = self.last.map_or(0., |last| (now - last).max(0.));
    self.last = Some(now);
    dt
  }
}
