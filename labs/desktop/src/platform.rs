//! Platform services implementation.

use graphics_labs::{Features, PlatformServices};
use std::{
  collections::HashMap,
  error::Error,
  fmt, fs, io,
  path::{Path, PathBuf},
};

/// Desktop implementation of the [`PlatformServices`] API.
///
/// Every model a lab declares is read from disk before the lab starts.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  models: HashMap<String, String>,
}

impl DesktopPlatformServices {
  pub fn new(model_root: &Path, features: Features) -> Result<Self, DesktopFetchError> {
    let models: HashMap<_, _> = features
      .models()
      .iter()
      .map(|name| {
        let path = model_root.join(name);
        log::info!("loading model {}", path.display());

        fs::read_to_string(&path)
          .map(|source| (name.clone(), source))
          .map_err(|source| DesktopFetchError::CannotRead { path, source })
      })
      .collect::<Result<_, _>>()?;

    Ok(Self { models })
  }
}

#[derive(Debug)]
pub enum DesktopFetchError {
  UnknownModel(String),
  CannotRead { path: PathBuf, source: io::Error },
}

impl fmt::Display for DesktopFetchError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DesktopFetchError::UnknownModel(ref name) => write!(f, "unknown model: {}", name),
      DesktopFetchError::CannotRead { ref path, ref source } => {
        write!(f, "cannot read {}: {}", path.display(), source)
      }
    }
  }
}

impl Error for DesktopFetchError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DesktopFetchError::CannotRead { ref source, .. } => Some(source),
      _ => None,
    }
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = DesktopFetchError;

  fn fetch_model(&mut self, name: impl AsRef<str>) -> Result<&str, Self::FetchError> {
    let name = name.as_ref();
    self
      .models
      .get(name)
      .map(String::as_str)
      .ok_or_else(|| DesktopFetchError::UnknownModel(name.to_owned()))
  }
}
