use std::path::PathBuf;

/// Errors from loading or validating simulator inputs.
///
/// Nothing on the per-frame path returns this: ticking, resetting and
/// drawing operate on data that has already been loaded.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SimError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Read a JSON file into `T`, attaching the path to any failure.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| SimError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON, attaching the path to any failure.
pub(crate) fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| SimError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}
