//! Session signing key loading.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral key.
    Debug,
    /// Release builds require a readable key file.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading the session key.
#[derive(thiserror::Error, Debug)]
pub enum SessionKeyError {
    /// Release builds need an explicit key file.
    #[error("no session key file configured; set CONDUIT_SESSION_KEY_FILE")]
    Missing,
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the cookie signing key from `path`.
///
/// Debug builds substitute a random key when the file is absent or
/// unreadable, which invalidates sessions on restart.
pub fn load_session_key(path: Option<&Path>, mode: BuildMode) -> Result<Key, SessionKeyError> {
    let Some(path) = path else {
        return match mode {
            BuildMode::Debug => {
                warn!("no session key file configured; using temporary key (dev only)");
                Ok(Key::generate())
            }
            BuildMode::Release => Err(SessionKeyError::Missing),
        };
    };

    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionKeyError::TooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => match mode {
            BuildMode::Debug => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            BuildMode::Release => Err(SessionKeyError::Read {
                path: path.to_path_buf(),
                source: error,
            }),
        },
    }
}
