use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Where extracted descriptors and generated bindings are placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    abi_dir: String,
    bindings_dir: String,
}

impl OutputLayout {
    pub fn new(
        root: impl Into<PathBuf>,
        abi_dir: impl Into<String>,
        bindings_dir: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            abi_dir: abi_dir.into(),
            bindings_dir: bindings_dir.into(),
        }
    }

    pub fn abi_dir(&self) -> PathBuf {
        self.root.join(&self.abi_dir)
    }

    pub fn bindings_dir(&self) -> PathBuf {
        self.root.join(&self.bindings_dir)
    }

    pub fn ensure_abi_dir(&self) -> Result<PathBuf> {
        mkdir_if_not_exist(&self.root, &self.abi_dir)
    }

    pub fn ensure_bindings_dir(&self) -> Result<PathBuf> {
        mkdir_if_not_exist(&self.root, &self.bindings_dir)
    }

    pub fn abi_file(&self, input: &Path) -> Option<PathBuf> {
        input.file_name().map(|name| self.abi_dir().join(name))
    }

    pub fn bindings_file(&self, contract_name: &str, extension: &str) -> PathBuf {
        self.bindings_dir()
            .join(format!("{}.{}", contract_name, extension))
    }

    /// The absolute abi directory, if it lies strictly inside `dir`.
    pub fn abi_dir_within(&self, dir: &Path) -> Option<PathBuf> {
        let abi = std::path::absolute(self.abi_dir()).ok()?;
        let dir = std::path::absolute(dir).ok()?;
        (abi != dir && abi.starts_with(&dir)).then_some(abi)
    }
}

/// True if `path` is `dir` or lies under it.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    std::path::absolute(path).map_or(false, |path| path.starts_with(dir))
}

fn mkdir_if_not_exist(prefix: &Path, dir: &str) -> Result<PathBuf> {
    // A file sitting at the root itself makes every subdirectory unreachable.
    for path in [prefix.to_path_buf(), prefix.join(dir)] {
        if let Ok(meta) = std::fs::metadata(&path) {
            if !meta.is_dir() {
                return Err(Error::NotADirectory { path });
            }
        }
    }

    let path = prefix.join(dir);
    if !path.is_dir() {
        std::fs::create_dir_all(&path).map_err(|e| Error::io("create dir", &path, e))?;
        tracing::debug!("created output directory {}", path.display());
    }
    Ok(path)
}
