//! Rubik's cube puzzle engine.
//!
//! The puzzle is made of 27 [`Cubie`]s living on the integer lattice `{-1, 0, 1}³`. Layers turn by
//! quarter-turns, animated over a number of ticks (one tick per rendered frame). Turns can be requested one at a
//! time from user input, or queued as a script (a scramble) that plays back at a faster pace.
//!
//! Nothing in here touches the GPU.

mod cubie;
mod turn;

pub use cubie::{Color, Cubie, Face};
pub use turn::{Axis, Direction, Turn};

use rand::{seq::SliceRandom as _, Rng};
use std::collections::VecDeque;

/// Number of ticks a requested turn lasts.
pub const NORMAL_TURN_TICKS: u32 = 50;

/// Number of ticks a scripted turn lasts.
pub const FAST_TURN_TICKS: u32 = 15;

/// Number of turns in a scramble.
pub const SCRAMBLE_LENGTH: usize = 30;

/// A turn being animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveTurn {
  pub turn: Turn,
  pub elapsed: u32,
  pub duration: u32,
}

impl ActiveTurn {
  pub fn progress(&self) -> f32 {
    self.elapsed as f32 / self.duration.max(1) as f32
  }

  pub fn angle(&self) -> f32 {
    self.turn.angle(self.progress())
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
  Idle,
  Turning(ActiveTurn),
  /// The cube was solved by hand; input is locked until the celebration is dismissed.
  Celebrating,
}

/// Something that happened during a [`Puzzle::tick`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PuzzleEvent {
  TurnCompleted(Turn),
  Solved,
}

#[derive(Clone, Debug)]
pub struct Puzzle {
  cubies: Vec<Cubie>,
  phase: Phase,
  queue: VecDeque<Turn>,
  scrambling: bool,
  turn_ticks: u32,
}

impl Default for Puzzle {
  fn default() -> Self {
    Self::new()
  }
}

impl Puzzle {
  /// A solved cube.
  pub fn new() -> Self {
    let mut cubies = Vec::with_capacity(27);

    for x in -1..=1 {
      for y in -1..=1 {
        for z in -1..=1 {
          cubies.push(Cubie::solved([x, y, z]));
        }
      }
    }

    Puzzle {
      cubies,
      phase: Phase::Idle,
      queue: VecDeque::new(),
      scrambling: false,
      turn_ticks: NORMAL_TURN_TICKS,
    }
  }

  pub fn cubies(&self) -> &[Cubie] {
    &self.cubies
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_scrambling(&self) -> bool {
    self.scrambling
  }

  pub fn is_celebrating(&self) -> bool {
    self.phase == Phase::Celebrating
  }

  /// Number of scripted turns not started yet.
  pub fn pending_turns(&self) -> usize {
    self.queue.len()
  }

  /// Active turn and current angle of its layer, in radians.
  pub fn animation(&self) -> Option<(Turn, f32)> {
    match self.phase {
      Phase::Turning(ref active) => Some((active.turn, active.angle())),
      _ => None,
    }
  }

  /// Whether every outer face of the cube shows its home color.
  ///
  /// Turning a whole slab of the cube by hand leaves every face uniform, but colored after another face: that
  /// doesn't count as solved.
  pub fn is_solved(&self) -> bool {
    self.cubies.iter().all(|cubie| {
      Face::ALL
        .iter()
        .filter(|&&face| cubie.is_outer(face))
        .all(|&face| cubie.color(face) == face.home_color())
    })
  }

  /// Instantly turn a layer.
  pub fn apply_turn(&mut self, turn: Turn) {
    for cubie in self.cubies.iter_mut().filter(|cubie| turn.contains(cubie.position)) {
      cubie.turn(&turn);
    }
  }

  /// Start animating a turn.
  ///
  /// Returns `false` if the puzzle is busy: a turn is animating, a script is playing or the cube is celebrating.
  pub fn request_turn(&mut self, turn: Turn) -> bool {
    if self.phase != Phase::Idle || self.scrambling || !self.queue.is_empty() {
      return false;
    }

    self.start(turn);
    true
  }

  /// Queue a script of turns, played at the fast pace.
  ///
  /// Returns `false` if a script is already playing or the cube is celebrating.
  pub fn queue_turns(&mut self, turns: impl IntoIterator<Item = Turn>) -> bool {
    if self.scrambling || self.phase == Phase::Celebrating {
      return false;
    }

    self.queue.extend(turns);
    self.scrambling = !self.queue.is_empty();
    true
  }

  /// Queue `count` random turns.
  pub fn scramble<R>(&mut self, rng: &mut R, count: usize) -> bool
  where
    R: Rng + ?Sized,
  {
    if self.scrambling || self.phase == Phase::Celebrating {
      return false;
    }

    let turns: Vec<_> = (0..count).filter_map(|_| Turn::ALL.choose(&mut *rng).copied()).collect();
    self.queue_turns(turns)
  }

  /// Leave the celebration.
  pub fn dismiss_celebration(&mut self) {
    if self.phase == Phase::Celebrating {
      self.phase = Phase::Idle;
    }

    self.scrambling = false;
  }

  /// Advance the animation by one tick.
  pub fn tick(&mut self) -> Option<PuzzleEvent> {
    match self.phase {
      Phase::Celebrating => None,

      Phase::Idle => {
        if let Some(turn) = self.queue.pop_front() {
          self.turn_ticks = FAST_TURN_TICKS;
          self.start(turn);
        } else {
          self.scrambling = false;
          self.turn_ticks = NORMAL_TURN_TICKS;
        }

        None
      }

      Phase::Turning(mut active) => {
        active.elapsed += 1;

        if active.elapsed < active.duration {
          self.phase = Phase::Turning(active);
          return None;
        }

        self.apply_turn(active.turn);
        self.phase = Phase::Idle;

        if !self.scrambling && self.is_solved() {
          self.phase = Phase::Celebrating;
          Some(PuzzleEvent::Solved)
        } else {
          Some(PuzzleEvent::TurnCompleted(active.turn))
        }
      }
    }
  }

  fn start(&mut self, turn: Turn) {
    self.phase = Phase::Turning(ActiveTurn {
      turn,
      elapsed: 0,
      duration: self.turn_ticks,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, SeedableRng as _};
  use std::collections::HashSet;

  fn run_until_idle(puzzle: &mut Puzzle) -> Vec<PuzzleEvent> {
    let mut events = Vec::new();

    for _ in 0..10_000 {
      if let Some(event) = puzzle.tick() {
        events.push(event);
      }

      let settled = puzzle.phase() == Phase::Idle && puzzle.pending_turns() == 0 && !puzzle.is_scrambling();

      if settled || puzzle.is_celebrating() {
        break;
      }
    }

    events
  }

  // colors of each cubie regardless of orientation, for the whole cube regardless of placement
  fn sticker_sets(puzzle: &Puzzle) -> Vec<String> {
    let mut sets: Vec<_> = puzzle
      .cubies()
      .iter()
      .map(|c| {
        let mut colors: Vec<_> = c.faces.iter().map(|color| format!("{:?}", color)).collect();
        colors.sort();
        colors.join(",")
      })
      .collect();
    sets.sort();
    sets
  }

  #[test]
  fn new_puzzle_is_solved() {
    let puzzle = Puzzle::new();

    assert_eq!(puzzle.cubies().len(), 27);
    assert!(puzzle.is_solved());
    assert_eq!(puzzle.phase(), Phase::Idle);
  }

  #[test]
  fn any_single_turn_unsolves() {
    for t in Turn::ALL {
      let mut puzzle = Puzzle::new();
      puzzle.apply_turn(t);
      assert!(!puzzle.is_solved(), "{:?}", t);
    }
  }

  #[test]
  fn turn_then_inverse_is_identity() {
    for t in Turn::ALL {
      let mut puzzle = Puzzle::new();
      let before = puzzle.cubies().to_vec();

      puzzle.apply_turn(t);
      puzzle.apply_turn(t.inverse());

      assert_eq!(puzzle.cubies(), &before[..]);
    }
  }

  #[test]
  fn four_quarter_turns_are_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut puzzle = Puzzle::new();

    for _ in 0..10 {
      let t = *Turn::ALL.choose(&mut rng).unwrap();
      puzzle.apply_turn(t);
    }

    let before = puzzle.cubies().to_vec();

    for t in Turn::ALL {
      for _ in 0..4 {
        puzzle.apply_turn(t);
      }

      assert_eq!(puzzle.cubies(), &before[..]);
    }
  }

  #[test]
  fn positions_stay_a_permutation_and_stickers_follow_their_cubie() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut puzzle = Puzzle::new();
    let before = sticker_sets(&puzzle);

    for _ in 0..100 {
      puzzle.apply_turn(*Turn::ALL.choose(&mut rng).unwrap());
    }

    let positions: HashSet<_> = puzzle.cubies().iter().map(|c| c.position).collect();
    assert_eq!(positions.len(), 27);
    assert!(positions.iter().all(|p| p.iter().all(|c| (-1..=1).contains(c))));

    assert_eq!(sticker_sets(&puzzle), before);
  }

  #[test]
  fn requested_turn_animates_for_normal_duration() {
    let mut puzzle = Puzzle::new();
    let t = Turn::from_key('q').unwrap();

    assert!(puzzle.request_turn(t));
    assert_eq!(puzzle.animation(), Some((t, 0.)));

    for _ in 1..NORMAL_TURN_TICKS {
      assert_eq!(puzzle.tick(), None);
    }

    let (_, angle) = puzzle.animation().unwrap();
    assert!(angle > 0. && angle < std::f32::consts::FRAC_PI_2);

    assert_eq!(puzzle.tick(), Some(PuzzleEvent::TurnCompleted(t)));
    assert_eq!(puzzle.phase(), Phase::Idle);
    assert!(!puzzle.is_solved());
  }

  #[test]
  fn turn_is_rejected_while_turning() {
    let mut puzzle = Puzzle::new();

    assert!(puzzle.request_turn(Turn::from_key('q').unwrap()));
    assert!(!puzzle.request_turn(Turn::from_key('w').unwrap()));
  }

  #[test]
  fn undoing_a_turn_by_hand_celebrates() {
    let mut puzzle = Puzzle::new();
    let t = Turn::from_key('f').unwrap();

    puzzle.request_turn(t);
    assert_eq!(run_until_idle(&mut puzzle), vec![PuzzleEvent::TurnCompleted(t)]);

    puzzle.request_turn(t.inverse());
    let events = run_until_idle(&mut puzzle);

    assert_eq!(events, vec![PuzzleEvent::Solved]);
    assert!(puzzle.is_celebrating());
    assert!(!puzzle.request_turn(t));
    assert!(!puzzle.scramble(&mut StdRng::seed_from_u64(0), SCRAMBLE_LENGTH));

    puzzle.dismiss_celebration();
    assert_eq!(puzzle.phase(), Phase::Idle);
    assert!(puzzle.request_turn(t));
  }

  #[test]
  fn rotating_the_whole_cube_is_not_solving_it() {
    let mut puzzle = Puzzle::new();
    let mut events = Vec::new();

    for key in ['q', 'a', 'z'] {
      assert!(puzzle.request_turn(Turn::from_key(key).unwrap()));
      events.extend(run_until_idle(&mut puzzle));
    }

    assert!(events.iter().all(|e| matches!(e, PuzzleEvent::TurnCompleted(_))));
    assert!(!puzzle.is_celebrating());
    assert!(!puzzle.is_solved());

    for key in ['w', 's', 'x'] {
      assert!(puzzle.request_turn(Turn::from_key(key).unwrap()));
      events = run_until_idle(&mut puzzle);
    }

    assert_eq!(events, vec![PuzzleEvent::Solved]);
  }

  #[test]
  fn scramble_plays_fast_and_never_celebrates() {
    let mut puzzle = Puzzle::new();
    let mut rng = StdRng::seed_from_u64(3);

    assert!(puzzle.scramble(&mut rng, SCRAMBLE_LENGTH));
    assert!(puzzle.is_scrambling());
    assert!(!puzzle.scramble(&mut rng, SCRAMBLE_LENGTH));
    assert!(!puzzle.request_turn(Turn::from_key('q').unwrap()));

    // the first tick picks the scripted turn up
    assert_eq!(puzzle.tick(), None);
    match puzzle.phase() {
      Phase::Turning(active) => assert_eq!(active.duration, FAST_TURN_TICKS),
      phase => panic!("unexpected phase {:?}", phase),
    }

    let events = run_until_idle(&mut puzzle);

    assert_eq!(events.len(), SCRAMBLE_LENGTH);
    assert!(events.iter().all(|e| matches!(e, PuzzleEvent::TurnCompleted(_))));
    assert!(!puzzle.is_scrambling());
    assert!(!puzzle.is_celebrating());
  }

  #[test]
  fn scripted_turn_that_solves_does_not_celebrate() {
    let mut puzzle = Puzzle::new();
    let t = Turn::from_key('k').unwrap();

    assert!(puzzle.queue_turns(vec![t, t.inverse()]));
    let events = run_until_idle(&mut puzzle);

    assert_eq!(events, vec![PuzzleEvent::TurnCompleted(t), PuzzleEvent::TurnCompleted(t.inverse())]);
    assert!(puzzle.is_solved());
    assert!(!puzzle.is_celebrating());
  }

  #[test]
  fn normal_pace_is_restored_after_a_script() {
    let mut puzzle = Puzzle::new();
    let t = Turn::from_key('a').unwrap();

    puzzle.queue_turns(vec![t]);
    run_until_idle(&mut puzzle);

    assert!(puzzle.request_turn(t));
    match puzzle.phase() {
      Phase::Turning(active) => assert_eq!(active.duration, NORMAL_TURN_TICKS),
      phase => panic!("unexpected phase {:?}", phase),
    }
  }

  #[test]
  fn empty_script_is_not_a_scramble() {
    let mut puzzle = Puzzle::new();

    assert!(puzzle.queue_turns(Vec::new()));
    assert!(!puzzle.is_scrambling());
    assert!(puzzle.request_turn(Turn::from_key('z').unwrap()));
  }
}
