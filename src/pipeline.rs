use crate::error::{Error, Result};
use crate::extract::extract_from_file;
use crate::generator::{GenerateRequest, Generator};
use crate::layout::{is_within, OutputLayout};
use crate::walker::{artifact_files, is_artifact};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failing file and continue the walk.
    #[default]
    Isolate,
    /// Abort the walk on the first failure.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated {
        contract_name: String,
        abi: PathBuf,
        bindings: PathBuf,
    },
    /// Nameless artifacts (libraries, interfaces) only get their abi written.
    AbiOnly { abi: PathBuf },
}

/// What happened to every artifact of a run.
#[derive(Debug, Default)]
pub struct Report {
    pub processed: Vec<(PathBuf, Outcome)>,
    /// Artifacts that are not deployable contracts.
    pub skipped: Vec<(PathBuf, Error)>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len() + self.failed.len()
    }

    pub fn generated(&self) -> usize {
        self.processed
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Generated { .. }))
            .count()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(Error::Incomplete {
                failed: self.failed.len(),
                total: self.total(),
            })
        }
    }
}

#[derive(Debug)]
pub struct Processor<G> {
    layout: OutputLayout,
    package: String,
    generator: G,
    policy: FailurePolicy,
}

impl<G: Generator> Processor<G> {
    pub fn new(layout: OutputLayout, package: impl Into<String>, generator: G) -> Self {
        Self {
            layout,
            package: package.into(),
            generator,
            policy: FailurePolicy::default(),
        }
    }

    pub fn set_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Processes a single artifact file or every artifact under a directory.
    pub fn process(&self, input: &Path) -> Result<Report> {
        let meta = std::fs::metadata(input).map_err(|e| Error::io("stat", input, e))?;
        if meta.is_dir() {
            return self.process_dir(input);
        }

        let outcome = self.process_file(input)?;
        Ok(Report {
            processed: vec![(input.to_path_buf(), outcome)],
            ..Default::default()
        })
    }

    pub fn process_file(&self, input: &Path) -> Result<Outcome> {
        if !is_artifact(input) {
            return Err(Error::UnsupportedFormat {
                path: input.to_path_buf(),
            });
        }

        self.layout.ensure_abi_dir()?;
        let abi = self
            .layout
            .abi_file(input)
            .ok_or_else(|| Error::UnsupportedFormat {
                path: input.to_path_buf(),
            })?;

        let contract_name = extract_from_file(input, &abi)?;
        if contract_name.is_empty() {
            tracing::debug!(
                "{} has no contract name, skipping bindings",
                input.display()
            );
            return Ok(Outcome::AbiOnly { abi });
        }

        self.layout.ensure_bindings_dir()?;
        let bindings = self
            .layout
            .bindings_file(&contract_name, self.generator.extension());

        tracing::info!("generating bindings for {}", contract_name);

        self.generator
            .generate(&GenerateRequest {
                abi: &abi,
                contract_name: &contract_name,
                package: &self.package,
                out: &bindings,
            })
            .map_err(|source| Error::Generator {
                contract: contract_name.clone(),
                source,
            })?;

        Ok(Outcome::Generated {
            contract_name,
            abi,
            bindings,
        })
    }

    pub fn process_dir(&self, root: &Path) -> Result<Report> {
        let mut report = Report::default();

        // The abi output is json too, never feed it back in.
        let own_output = self.layout.abi_dir_within(root);
        let files = artifact_files(root, move |path| {
            own_output.as_deref().map_or(false, |abi| is_within(path, abi))
        });

        for file in files {
            let file = match file {
                Ok(file) => file,
                Err(e) if self.policy == FailurePolicy::FailFast => return Err(e),
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failed.push((root.to_path_buf(), e));
                    continue;
                }
            };

            match self.process_file(&file) {
                Ok(outcome) => report.processed.push((file, outcome)),
                Err(e) if self.policy == FailurePolicy::FailFast => return Err(e),
                Err(e @ Error::Validation { .. }) => {
                    tracing::info!("skipping {}", e);
                    report.skipped.push((file, e));
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failed.push((file, e));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::{FailingGenerator, RecordingGenerator};

    const TOKEN: &str =
        r#"{"contractName":"Token","abi":[{"name":"transfer"}],"bytecode":"0x6080"}"#;
    const INTERFACE: &str =
        r#"{"contractName":"ITokenInterface","abi":[{"name":"transfer"}],"bytecode":"0x"}"#;
    const NAMELESS: &str = r#"{"contractName":"","abi":[{"name":"x"}],"bytecode":"0xabc"}"#;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn processor<'a>(
        out: &Path,
        generator: &'a RecordingGenerator,
    ) -> Processor<&'a RecordingGenerator> {
        Processor::new(OutputLayout::new(out, "abi", "build"), "api", generator)
    }

    #[test]
    fn test_generates_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("artifacts/Token.json");
        let out = dir.path().join("build");
        write(&input, TOKEN);
        let generator = RecordingGenerator::default();

        let outcome = processor(&out, &generator).process_file(&input).unwrap();

        let abi = out.join("abi/Token.json");
        let bindings = out.join("build/Token.go");
        assert_eq!(
            outcome,
            Outcome::Generated {
                contract_name: "Token".into(),
                abi: abi.clone(),
                bindings: bindings.clone(),
            }
        );
        assert_eq!(
            std::fs::read_to_string(&abi).unwrap(),
            r#"[{"name":"transfer"}]"#
        );
        assert_eq!(
            generator.calls.borrow().as_slice(),
            [("Token".to_string(), "api".to_string(), abi, bindings)]
        );
    }

    #[test]
    fn test_interface_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ITokenInterface.json");
        let out = dir.path().join("build");
        write(&input, INTERFACE);
        let generator = RecordingGenerator::default();

        let err = processor(&out, &generator)
            .process_file(&input)
            .unwrap_err();

        assert!(matches!(err, Error::Validation { .. }));
        assert!(!out.join("abi/ITokenInterface.json").exists());
        assert!(!out.join("build").exists());
        assert!(generator.calls.borrow().is_empty());
    }

    #[test]
    fn test_nameless_skips_generation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Lib.json");
        let out = dir.path().join("build");
        write(&input, NAMELESS);
        let generator = RecordingGenerator::default();

        let outcome = processor(&out, &generator).process_file(&input).unwrap();

        assert_eq!(
            outcome,
            Outcome::AbiOnly {
                abi: out.join("abi/Lib.json")
            }
        );
        assert!(generator.calls.borrow().is_empty());
        assert!(!out.join("build").exists());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        write(&input, TOKEN);
        let generator = RecordingGenerator::default();

        let err = processor(&dir.path().join("build"), &generator)
            .process_file(&input)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_output_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Token.json");
        let out = dir.path().join("build");
        write(&input, TOKEN);
        std::fs::write(&out, "").unwrap();
        let generator = RecordingGenerator::default();

        let err = processor(&out, &generator).process(&input).unwrap_err();

        assert!(matches!(err, Error::NotADirectory { .. }));
        assert!(generator.calls.borrow().is_empty());
    }

    #[test]
    fn test_generator_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Token.json");
        write(&input, TOKEN);

        let processor = Processor::new(
            OutputLayout::new(dir.path().join("build"), "abi", "build"),
            "api",
            FailingGenerator,
        );

        match processor.process_file(&input) {
            Err(Error::Generator { contract, .. }) => assert_eq!(contract, "Token"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_process_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = dir.path().join("artifacts");
        write(&artifacts.join("contracts/Token.sol/Token.json"), TOKEN);
        write(
            &artifacts.join("contracts/Token.sol/Token.dbg.json"),
            r#"{"_format":"hh-sol-dbg-1","buildInfo":"../../build-info/x.json"}"#,
        );
        write(&artifacts.join("contracts/IToken.sol/ITokenInterface.json"), INTERFACE);
        write(&artifacts.join("contracts/Lib.sol/Lib.json"), NAMELESS);
        write(&artifacts.join("notes.txt"), "not an artifact");
        let generator = RecordingGenerator::default();

        let report = processor(&dir.path().join("build"), &generator)
            .process(&artifacts)
            .unwrap();

        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.generated(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(report.total(), 4);

        let calls = generator.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Token");
    }

    #[test]
    fn test_process_dir_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a/Broken.json"), "{");
        write(&dir.path().join("b/Token.json"), TOKEN);
        let generator = RecordingGenerator::default();

        let report = processor(&dir.path().join("out"), &generator)
            .process(dir.path())
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].1, Error::Decode { .. }));
        assert_eq!(report.generated(), 1);
        assert!(matches!(
            report.into_result(),
            Err(Error::Incomplete {
                failed: 1,
                total: 2
            })
        ));
    }

    #[test]
    fn test_process_dir_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a/Broken.json"), "{");
        write(&dir.path().join("b/Token.json"), TOKEN);
        let generator = RecordingGenerator::default();

        let err = processor(&dir.path().join("out"), &generator)
            .set_policy(FailurePolicy::FailFast)
            .process(dir.path())
            .unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert!(generator.calls.borrow().is_empty());
    }

    #[test]
    fn test_process_dir_fail_fast_on_interface() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a/ITokenInterface.json"), INTERFACE);
        write(&dir.path().join("b/Token.json"), TOKEN);
        let generator = RecordingGenerator::default();

        let err = processor(&dir.path().join("out"), &generator)
            .set_policy(FailurePolicy::FailFast)
            .process(dir.path())
            .unwrap_err();

        assert!(matches!(err, Error::Validation { .. }));
        assert!(generator.calls.borrow().is_empty());
    }

    #[test]
    fn test_process_dir_under_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        write(&build.join("contracts/Token.json"), TOKEN);
        let generator = RecordingGenerator::default();

        let report = processor(&build, &generator)
            .process(&build.join("contracts"))
            .unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(generator.calls.borrow().len(), 1);
        assert!(build.join("abi/Token.json").is_file());
    }

    #[test]
    fn test_process_dir_output_root_is_parent() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("artifacts/Token.json"), TOKEN);
        let generator = RecordingGenerator::default();
        let processor = Processor::new(
            OutputLayout::new(dir.path(), "abi", "bindings"),
            "api",
            &generator,
        );

        let report = processor.process(&dir.path().join("artifacts")).unwrap();
        assert_eq!(report.total(), 1);

        // walking the output root itself still prunes the abi output
        let report = processor.process(dir.path()).unwrap();
        assert_eq!(report.total(), 1);
        assert_eq!(generator.calls.borrow().len(), 2);
    }

    #[test]
    fn test_process_dir_ignores_own_output() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("Token.json"), TOKEN);
        let generator = RecordingGenerator::default();
        let processor = processor(&dir.path().join("build"), &generator);

        processor.process(dir.path()).unwrap().into_result().unwrap();
        // second run sees build/abi/Token.json on disk but must not pick it up
        let report = processor.process(dir.path()).unwrap().into_result().unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(generator.calls.borrow().len(), 2);
    }
}
