use crate::config::Config;
use crate::generator::GeneratorKind;
use crate::pipeline::{Processor, Report};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

// Long flags that are also accepted with a single dash, as in `-pkg api`.
const LONG_FLAGS: &[&str] = &[
    "pkg",
    "out",
    "root",
    "abi-dir",
    "generator",
    "generator-bin",
    "fail-fast",
    "config",
    "version",
    "help",
];

/// Generate contract bindings from compiled build artifacts.
#[derive(Debug, Parser)]
#[command(name = "hhabigen", version)]
pub struct Hhabigen {
    /// Artifact file or directory of artifacts.
    path: Option<PathBuf>,
    /// Package name to place the generated code into.
    #[arg(long)]
    pkg: Option<String>,
    /// Subdirectory of the output root for the generated bindings.
    #[arg(long)]
    out: Option<String>,
    /// Output root holding the abi and bindings subdirectories.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Subdirectory of the output root for the extracted abis.
    #[arg(long)]
    abi_dir: Option<String>,
    #[arg(long, value_enum)]
    generator: Option<GeneratorKind>,
    /// Program run by the abigen generator.
    #[arg(long, env = "HHABIGEN_GENERATOR_BIN")]
    generator_bin: Option<String>,
    /// Stop at the first artifact that fails.
    #[arg(long, default_value = "false")]
    fail_fast: bool,
    /// JSON file with default settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Hhabigen {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            pkg: None,
            out: None,
            root: None,
            abi_dir: None,
            generator: None,
            generator_bin: None,
            fail_fast: false,
            config: None,
        }
    }

    /// Parses the process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_generator_bin(mut self, bin: impl Into<String>) -> Self {
        self.generator_bin = Some(bin.into());
        self
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }

    /// The file config, if any, with flags layered on top.
    pub fn config(&self) -> eyre::Result<Config> {
        let mut config = match self.config.as_ref() {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(pkg) = &self.pkg {
            config = config.with_package(pkg);
        }
        if let Some(out) = &self.out {
            config = config.with_bindings_dir(out);
        }
        if let Some(root) = &self.root {
            config = config.with_output_root(root);
        }
        if let Some(dir) = &self.abi_dir {
            config = config.with_abi_dir(dir);
        }
        if let Some(generator) = self.generator {
            config = config.with_generator(generator);
        }
        if let Some(bin) = &self.generator_bin {
            config = config.with_generator_bin(bin);
        }
        if self.fail_fast {
            config = config.with_fail_fast(true);
        }
        Ok(config)
    }

    pub fn run(&self, config: &Config) -> crate::Result<Report> {
        let path = self.path.clone().unwrap_or_default();

        let processor = Processor::new(
            config.layout(),
            &config.package,
            config.generator.build(&config.generator_bin),
        )
        .set_policy(config.policy());

        let report = processor.process(&path)?;

        tracing::info!(
            "processed {} artifacts: {} bindings generated, {} skipped, {} failed",
            report.total(),
            report.generated(),
            report.skipped.len(),
            report.failed.len()
        );

        report.into_result()
    }
}

/// Rewrites `-flag` to `--flag` for the known long flags. Everything after
/// `--` is left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let flag = s.strip_prefix('-').filter(|f| !f.starts_with('-'))?;
            let name = flag.split('=').next().unwrap_or(flag);
            LONG_FLAGS
                .contains(&name)
                .then(|| OsString::from(format!("-{}", s)))
        });

        if arg == "--" {
            passthrough = true;
        }
        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}
