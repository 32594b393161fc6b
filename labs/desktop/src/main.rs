mod platform;

use glfw::{Action, Context as _, Key, Modifiers, MouseButton, WindowEvent};
use graphics_labs::{rubik::Turn, InputAction, Lab, LoopFeedback, Motion};
use luminance_glfw::GlfwSurface;
use luminance_windowing::{WindowDim, WindowOpt};
use platform::DesktopPlatformServices;
use std::{iter, path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long, default_value = "labs/desktop/models")]
  /// Directory where to pick OBJ models from.
  models: PathBuf,

  #[structopt(short, long)]
  /// List available labs.
  list_labs: bool,

  #[structopt(long, default_value = "1200")]
  /// Window width.
  width: u32,

  #[structopt(long, default_value = "1200")]
  /// Window height.
  height: u32,

  /// Lab to run.
  lab: Option<String>,
}

/// Macro to declaratively add labs.
macro_rules! labs {
  ($($lab_name:literal, $lab_ident:ident),* $(,)?) => {
    fn show_available_labs() {
      println!("available labs:");
      $( println!("  - {}", $lab_name); )*
    }

    // create a function that will run a lab based on its name
    fn pick_and_run_lab(cli_opts: CLIOpts) {
      match cli_opts.lab.as_deref() {
        $(
          Some($lab_name) => run_lab::<graphics_labs::$lab_ident::LocalLab>(&cli_opts, $lab_name),
        )*

        _ => {
          log::error!("no lab found");
          show_available_labs();
        }
      }
    }
  }
}

// Run a lab.
fn run_lab<L>(cli_opts: &CLIOpts, name: &str)
where
  L: Lab,
{
  // Check the features so that we know what we need to load.
  let mut services = match DesktopPlatformServices::new(&cli_opts.models, L::features()) {
    Ok(services) => services,
    Err(e) => {
      log::error!("cannot load lab assets: {}", e);
      return;
    }
  };

  let dim = WindowDim::Windowed {
    width: cli_opts.width,
    height: cli_opts.height,
  };
  let surface = match GlfwSurface::new_gl33(name, WindowOpt::default().set_dim(dim)) {
    Ok(surface) => surface,
    Err(e) => {
      log::error!("cannot create GLFW surface: {:?}", e);
      return;
    }
  };
  let mut context = surface.context;
  let events = surface.events_rx;

  let lab = match L::bootstrap(&mut services, &mut context) {
    Ok(lab) => lab,
    Err(e) => {
      log::error!("cannot start {}: {}", name, e);
      return;
    }
  };
  let start_t = Instant::now();

  // first frame only carries the framebuffer size
  let (fb_w, fb_h) = context.window.get_framebuffer_size();
  let back_buffer = match context.back_buffer() {
    Ok(back_buffer) => back_buffer,
    Err(e) => {
      log::error!("cannot get the back buffer: {}", e);
      return;
    }
  };
  let feedback = lab.render_frame(
    0.,
    back_buffer,
    iter::once(InputAction::Resized {
      width: fb_w as _,
      height: fb_h as _,
    }),
    &mut context,
  );
  let mut lab = match feedback {
    LoopFeedback::Exit => return,
    LoopFeedback::Continue(lab) => lab,
  };

  'app: loop {
    // handle events
    context.window.glfw.poll_events();
    let actions = glfw::flush_messages(&events).flat_map(|(_, event)| adapt_events(event));

    let back_buffer = match context.back_buffer() {
      Ok(back_buffer) => back_buffer,
      Err(e) => {
        log::error!("cannot get the back buffer: {}", e);
        break 'app;
      }
    };

    let t = start_t.elapsed().as_secs_f32();
    let feedback = lab.render_frame(t, back_buffer, actions, &mut context);

    if let LoopFeedback::Continue(stepped) = feedback {
      lab = stepped;
      context.window.swap_buffers();
    } else {
      break 'app;
    }
  }
}

// lowercase letter of a letter key
fn letter(key: Key) -> Option<char> {
  let c = match key {
    Key::A => 'a',
    Key::B => 'b',
    Key::C => 'c',
    Key::D => 'd',
    Key::E => 'e',
    Key::F => 'f',
    Key::G => 'g',
    Key::H => 'h',
    Key::I => 'i',
    Key::J => 'j',
    Key::K => 'k',
    Key::L => 'l',
    Key::M => 'm',
    Key::N => 'n',
    Key::O => 'o',
    Key::P => 'p',
    Key::Q => 'q',
    Key::R => 'r',
    Key::S => 's',
    Key::T => 't',
    Key::U => 'u',
    Key::V => 'v',
    Key::W => 'w',
    Key::X => 'x',
    Key::Y => 'y',
    Key::Z => 'z',
    _ => return None,
  };

  Some(c)
}

// direction of a movement key
fn motion(key: Key) -> Option<Motion> {
  match key {
    Key::Up | Key::Kp5 => Some(Motion::Forward),
    Key::Down | Key::Kp2 => Some(Motion::Backward),
    Key::Left | Key::Kp1 => Some(Motion::Left),
    Key::Right | Key::Kp3 => Some(Motion::Right),
    Key::PageUp | Key::Kp7 => Some(Motion::Up),
    Key::PageDown | Key::Kp4 => Some(Motion::Down),
    _ => None,
  }
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => Some(InputAction::Quit),

    WindowEvent::Key(Key::Space, _, Action::Release, mods) => {
      if mods.is_empty() {
        Some(InputAction::MainToggle)
      } else if mods == Modifiers::Shift {
        Some(InputAction::AuxiliaryToggle)
      } else {
        None
      }
    }

    WindowEvent::Key(Key::Tab, _, Action::Press, mods) => {
      if mods.contains(Modifiers::Shift) {
        Some(InputAction::PreviousParameter)
      } else {
        Some(InputAction::NextParameter)
      }
    }

    // one-shot keys
    WindowEvent::Key(Key::R, _, Action::Press, _) => Some(InputAction::Scramble),
    WindowEvent::Key(Key::Enter, _, Action::Press, _) | WindowEvent::Key(Key::KpEnter, _, Action::Press, _) => {
      Some(InputAction::Confirm)
    }
    WindowEvent::Key(key, _, Action::Press, _) if letter(key).and_then(Turn::from_key).is_some() => {
      letter(key).and_then(Turn::from_key).map(InputAction::Turn)
    }

    WindowEvent::Key(key, _, Action::Press, _) | WindowEvent::Key(key, _, Action::Repeat, _) => {
      log::debug!("key press: {:?}", key);
      match key {
        Key::Equal | Key::KpAdd => Some(InputAction::Increase),
        Key::Minus | Key::KpSubtract => Some(InputAction::Decrease),
        _ => motion(key).map(Motion::action),
      }
    }

    WindowEvent::Key(key, _, Action::Release, _) => motion(key).map(InputAction::MotionReleased),

    WindowEvent::MouseButton(MouseButton::Button1, action, _) => match action {
      Action::Press => Some(InputAction::PrimaryPressed),
      Action::Release => Some(InputAction::PrimaryReleased),
      _ => None,
    },

    WindowEvent::CursorPos(x, y) => Some(InputAction::CursorMoved {
      x: x as _,
      y: y as _,
    }),

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width as _,
      height: height as _,
    }),

    WindowEvent::Scroll(_, amount) => Some(InputAction::VScroll {
      amount: amount as f32,
    }),

    _ => None,
  }
}

labs! {
  "isometric-cube", isometric_cube,
  "cube-grid", cube_grid,
  "rubiks-cube", rubiks_cube,
  "lit-cubes", lit_cubes,
  "obj-viewer", obj_viewer,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_labs {
    show_available_labs();
  } else {
    pick_and_run_lab(cli_opts);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use graphics_labs::rubik::{Axis, Direction};

  fn press(key: Key, mods: Modifiers) -> Option<InputAction> {
    adapt_events(WindowEvent::Key(key, 0, Action::Press, mods))
  }

  #[test]
  fn letters_turn_layers() {
    assert_eq!(
      press(Key::Q, Modifiers::empty()),
      Some(InputAction::Turn(Turn::new(Axis::Y, 1, Direction::CounterClockwise)))
    );
    assert_eq!(
      press(Key::N, Modifiers::empty()),
      Some(InputAction::Turn(Turn::new(Axis::Z, -1, Direction::Clockwise)))
    );
    assert_eq!(press(Key::R, Modifiers::empty()), Some(InputAction::Scramble));
    assert_eq!(press(Key::E, Modifiers::empty()), None);
  }

  #[test]
  fn turns_do_not_repeat() {
    let repeat = adapt_events(WindowEvent::Key(Key::Q, 0, Action::Repeat, Modifiers::empty()));
    assert_eq!(repeat, None);

    let repeat = adapt_events(WindowEvent::Key(Key::Up, 0, Action::Repeat, Modifiers::empty()));
    assert_eq!(repeat, Some(InputAction::Forward));
  }

  #[test]
  fn releasing_movement_keys_stops_motion() {
    let release = |key| adapt_events(WindowEvent::Key(key, 0, Action::Release, Modifiers::empty()));

    assert_eq!(release(Key::Up), Some(InputAction::MotionReleased(Motion::Forward)));
    assert_eq!(release(Key::Kp4), Some(InputAction::MotionReleased(Motion::Down)));
    assert_eq!(release(Key::Q), None);
  }

  #[test]
  fn toggles_and_parameters() {
    let release = |mods| adapt_events(WindowEvent::Key(Key::Space, 0, Action::Release, mods));

    assert_eq!(release(Modifiers::empty()), Some(InputAction::MainToggle));
    assert_eq!(release(Modifiers::Shift), Some(InputAction::AuxiliaryToggle));
    assert_eq!(press(Key::Tab, Modifiers::empty()), Some(InputAction::NextParameter));
    assert_eq!(press(Key::Tab, Modifiers::Shift), Some(InputAction::PreviousParameter));
    assert_eq!(press(Key::KpAdd, Modifiers::empty()), Some(InputAction::Increase));
    assert_eq!(press(Key::Enter, Modifiers::empty()), Some(InputAction::Confirm));
  }

  #[test]
  fn cli_defaults() {
    let opts = CLIOpts::from_iter(&["graphics-labs", "rubiks-cube"]);

    assert_eq!(opts.lab.as_deref(), Some("rubiks-cube"));
    assert_eq!(opts.models, PathBuf::from("labs/desktop/models"));
    assert_eq!((opts.width, opts.height), (1200, 1200));
    assert!(!opts.list_labs);
  }
}
