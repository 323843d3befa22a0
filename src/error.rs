use crate::artifact::InvalidArtifact;
use crate::generator::GeneratorError;
use std::path::PathBuf;
use std::process::ExitCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("decode artifact {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid artifact {}: {reason}", path.display())]
    Validation {
        path: PathBuf,
        reason: InvalidArtifact,
    },
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("supported only json files, got {}", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("output path {} already exists, but is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("generate bindings for {contract}: {source}")]
    Generator {
        contract: String,
        source: GeneratorError,
    },
    #[error("{failed} of {total} artifacts failed")]
    Incomplete { failed: usize, total: usize },
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Process exit status reported by the binary for this kind of failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Decode { .. } => 3,
            Self::Validation { .. } => 4,
            Self::Io { .. } => 5,
            Self::UnsupportedFormat { .. } => 6,
            Self::NotADirectory { .. } => 7,
            Self::Generator { .. } => 8,
            Self::Incomplete { .. } => 9,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
