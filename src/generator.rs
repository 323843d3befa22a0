use ethers::contract::Abigen;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Everything a backend needs to render bindings for one contract.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// Serialized interface descriptor.
    pub abi: &'a Path,
    pub contract_name: &'a str,
    pub package: &'a str,
    pub out: &'a Path,
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Status { program: String, status: ExitStatus },
    #[error("{0}")]
    Backend(String),
}

/// Turns an interface descriptor into source bindings.
pub trait Generator {
    /// File extension of the generated sources, without the dot.
    fn extension(&self) -> &str;

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), GeneratorError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), GeneratorError> {
        (**self).generate(request)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), GeneratorError> {
        (**self).generate(request)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// go-ethereum's `abigen` binary, Go bindings.
    #[default]
    Abigen,
    /// In-process ethers-rs abigen, Rust bindings.
    Ethers,
}

impl GeneratorKind {
    pub fn build(self, program: impl Into<String>) -> Box<dyn Generator> {
        match self {
            Self::Abigen => Box::new(AbigenCommand::new(program)),
            Self::Ethers => Box::new(EthersAbigen),
        }
    }
}

/// Runs an external `abigen` compatible binary.
#[derive(Debug, Clone)]
pub struct AbigenCommand {
    program: String,
}

impl AbigenCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(request: &GenerateRequest<'_>) -> Vec<OsString> {
        vec![
            "-abi".into(),
            request.abi.into(),
            "-out".into(),
            request.out.into(),
            "-type".into(),
            request.contract_name.into(),
            "-pkg".into(),
            request.package.into(),
        ]
    }
}

impl Generator for AbigenCommand {
    fn extension(&self) -> &str {
        "go"
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), GeneratorError> {
        let status = Command::new(&self.program)
            .args(Self::args(request))
            .status()
            .map_err(|source| GeneratorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(GeneratorError::Status {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Renders Rust bindings in process with ethers-rs.
///
/// Rust bindings live in a module named after the contract, so the package
/// name of the request is not used.
#[derive(Debug, Default, Clone, Copy)]
pub struct EthersAbigen;

impl Generator for EthersAbigen {
    fn extension(&self) -> &str {
        "rs"
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<(), GeneratorError> {
        // Pass the JSON itself, abigen resolves relative paths against the
        // manifest dir of whatever crate it was built for.
        let abi = std::fs::read_to_string(request.abi).map_err(|e| {
            GeneratorError::Backend(format!("read {}: {}", request.abi.display(), e))
        })?;

        let bindings = Abigen::new(request.contract_name, abi)
            .and_then(|abigen| abigen.generate())
            .map_err(|e| GeneratorError::Backend(format!("{:#}", e)))?;

        bindings
            .write_to_file(request.out)
            .map_err(|e| GeneratorError::Backend(format!("{:#}", e)))?;

        Ok(())
    }
}
