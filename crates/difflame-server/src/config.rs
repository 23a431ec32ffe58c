//! Server configuration.

use std::io;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use difflame_git::{ChangeSource, DiffBackend};

use crate::error::ServerError;

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "localhost";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 1234;

/// Fixed set of files a server in file mode may return.
///
/// Files are keyed by the path exactly as given at startup. Requests can only
/// name one of these keys; the key is never resolved against the filesystem.
#[derive(Debug, Clone)]
pub struct AllowList {
    entries: Vec<(String, PathBuf)>,
}

impl AllowList {
    /// Build an allow-list, checking every path is a readable regular file.
    pub fn new<I, P>(paths: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut entries: Vec<(String, PathBuf)> = Vec::new();

        for path in paths {
            let path = path.into();
            let metadata = std::fs::metadata(&path).map_err(|e| ServerError::io(&path, e))?;
            if !metadata.is_file() {
                let err = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
                return Err(ServerError::io(path, err));
            }
            std::fs::File::open(&path).map_err(|e| ServerError::io(&path, e))?;

            let name = path.display().to_string();
            if !entries.iter().any(|(existing, _)| *existing == name) {
                entries.push((name, path));
            }
        }

        if entries.is_empty() {
            return Err(ServerError::NoFiles);
        }

        Ok(Self { entries })
    }

    /// Names of the served files, in the order given.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Map a requested name to its path, defaulting to the first file.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Path, ServerError> {
        let Some(name) = name else {
            return Ok(&self.entries[0].1);
        };

        self.entries
            .iter()
            .find(|(allowed, _)| allowed == name)
            .map(|(_, path)| path.as_path())
            .ok_or_else(|| ServerError::NotAllowed {
                name: name.to_string(),
            })
    }
}

/// What `/data` serves.
#[derive(Debug, Clone)]
pub enum ServeMode {
    /// Diff a live repository on every request.
    Diffs {
        /// Repository and backend to diff with.
        source: ChangeSource,
    },
    /// Return previously saved trees.
    Files {
        /// Files that may be returned.
        files: AllowList,
    },
}

impl ServeMode {
    /// Diff mode for the repository at `repository` with the default backend.
    pub fn diffs(repository: impl Into<PathBuf>) -> Self {
        Self::Diffs {
            source: ChangeSource::new(repository),
        }
    }

    /// Diff mode with an explicit backend.
    pub fn diffs_with(repository: impl Into<PathBuf>, backend: DiffBackend) -> Self {
        Self::Diffs {
            source: ChangeSource::new(repository).with_backend(backend),
        }
    }

    /// File mode over the given saved trees.
    pub fn files<I, P>(paths: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Ok(Self::Files {
            files: AllowList::new(paths)?,
        })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Diffs { .. } => "diffs",
            Self::Files { .. } => "files",
        }
    }
}

/// Immutable server configuration, fixed for the process lifetime.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ServerConfig {
    /// Host name or IP to listen on.
    #[builder(default = "DEFAULT_ADDRESS.to_string()")]
    pub address: String,

    /// Port to listen on.
    #[builder(default = "DEFAULT_PORT")]
    pub port: u16,

    /// Serving mode and its argument.
    pub mode: ServeMode,
}

impl ServerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.address.as_ref().is_some_and(|a| a.trim().is_empty()) {
            return Err("Listen address cannot be empty".to_string());
        }
        if self.mode.is_none() {
            return Err("Serving mode is required".to_string());
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Create a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Config on the default address and port.
    pub fn new(mode: ServeMode) -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            mode,
        }
    }
}
