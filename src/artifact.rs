use serde::{Deserialize, Serialize};
use serde_json::Value;

// Placeholder emitted by the compiler for abstract contracts and interfaces.
const PLACEHOLDER_BYTECODE: &str = "0x";

/// A compiled contract artifact as written by the build toolchain.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub contract_name: String,
    #[serde(default)]
    pub source_name: String,
    // Kept opaque, the descriptor is only ever written back out.
    #[serde(default)]
    pub abi: Option<Value>,
    #[serde(default, rename = "bytecode")]
    pub byte_code: Option<String>,
    #[serde(default, rename = "deployedBytecode")]
    pub deployed_byte_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArtifact {
    #[error("abi is missing")]
    MissingAbi,
    #[error("abi is not an array")]
    AbiNotArray,
    #[error("abi is empty")]
    EmptyAbi,
    #[error("bytecode is missing")]
    MissingBytecode,
    #[error("bytecode is the \"0x\" placeholder")]
    PlaceholderBytecode,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("read artifact: {0}")]
    Read(#[from] std::io::Error),
    #[error("unmarshal artifact: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid artifact: {0}")]
    Invalid(#[from] InvalidArtifact),
}

impl Artifact {
    /// Decodes and validates an artifact.
    ///
    /// Artifacts without an interface descriptor or without real bytecode are
    /// rejected, those are never deployable and get no bindings.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self, ArtifactError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }

    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        match &self.abi {
            None | Some(Value::Null) => return Err(InvalidArtifact::MissingAbi),
            Some(Value::Array(entries)) if entries.is_empty() => {
                return Err(InvalidArtifact::EmptyAbi)
            }
            Some(Value::Array(_)) => {}
            Some(_) => return Err(InvalidArtifact::AbiNotArray),
        }

        match self.byte_code.as_deref() {
            None | Some("") => Err(InvalidArtifact::MissingBytecode),
            Some(PLACEHOLDER_BYTECODE) => Err(InvalidArtifact::PlaceholderBytecode),
            Some(_) => Ok(()),
        }
    }

    pub fn is_deployable(&self) -> bool {
        !matches!(
            self.byte_code.as_deref(),
            None | Some("") | Some(PLACEHOLDER_BYTECODE)
        )
    }

    /// Compact JSON of the interface descriptor alone.
    pub fn abi_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self.abi.as_ref().unwrap_or(&Value::Null))
    }
}
