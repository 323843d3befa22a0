use crate::artifact::{Artifact, ArtifactError};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Extracts the interface descriptor of the artifact at `input` into `output`
/// and returns the artifact's contract name, which may be empty.
///
/// Nothing is written unless the artifact decodes and validates.
pub fn extract_from_file(input: &Path, output: &Path) -> Result<String> {
    let path = std::path::absolute(input).map_err(|e| Error::io("resolve path", input, e))?;

    let artifact = {
        let file = File::open(&path).map_err(|e| Error::io("open file", &path, e))?;
        Artifact::from_reader(file).map_err(|e| match e {
            ArtifactError::Read(source) => Error::io("read file", &path, source),
            ArtifactError::Decode(source) => Error::Decode {
                path: path.clone(),
                source,
            },
            ArtifactError::Invalid(reason) => Error::Validation {
                path: path.clone(),
                reason,
            },
        })?
    };

    let marshalled = artifact
        .abi_json()
        .map_err(|e| marshal_error(&path, e))?;

    let mut out = File::create(output).map_err(|e| Error::io("create file", output, e))?;
    out.write_all(&marshalled)
        .map_err(|e| Error::io("write abi to", output, e))?;

    tracing::debug!("wrote abi of {} to {}", path.display(), output.display());

    Ok(artifact.contract_name)
}

fn marshal_error(path: &Path, e: serde_json::Error) -> Error {
    Error::io("marshal abi of", path, e.into())
}
