mod artifact;
pub mod config;
mod error;
mod extract;
pub mod generator;
mod hhabigen;
pub mod layout;
mod pipeline;
mod walker;

pub use artifact::{Artifact, ArtifactError, InvalidArtifact};
pub use error::{Error, Result};
pub use extract::extract_from_file;
pub use hhabigen::{normalize_args, Hhabigen};
pub use pipeline::{FailurePolicy, Outcome, Processor, Report};
pub use walker::{artifact_files, is_artifact, ARTIFACT_EXTENSION};
