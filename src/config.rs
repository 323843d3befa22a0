use crate::generator::GeneratorKind;
use crate::layout::OutputLayout;
use crate::pipeline::FailurePolicy;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Config represents the settings of a run, loaded from a JSON file and
// overridden by command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    // Package the generated bindings are placed into.
    pub package: String,
    // Directory holding the abi and bindings subdirectories.
    pub output_root: PathBuf,
    pub abi_dir: String,
    pub bindings_dir: String,
    pub generator: GeneratorKind,
    // Program invoked by the abigen backend.
    pub generator_bin: String,
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: "api".into(),
            output_root: PathBuf::from("build"),
            abi_dir: "abi".into(),
            bindings_dir: "build".into(),
            generator: GeneratorKind::Abigen,
            generator_bin: "abigen".into(),
            fail_fast: false,
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("open config {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .wrap_err_with(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_abi_dir(mut self, dir: impl Into<String>) -> Self {
        self.abi_dir = dir.into();
        self
    }

    pub fn with_bindings_dir(mut self, dir: impl Into<String>) -> Self {
        self.bindings_dir = dir.into();
        self
    }

    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_generator_bin(mut self, bin: impl Into<String>) -> Self {
        self.generator_bin = bin.into();
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_root, &self.abi_dir, &self.bindings_dir)
    }

    pub fn policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Isolate
        }
    }
}
