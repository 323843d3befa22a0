use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const ARTIFACT_EXTENSION: &str = "json";

pub fn is_artifact(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == ARTIFACT_EXTENSION)
}

/// Recursively lists the artifact files under `root` in a stable order.
///
/// Anything below `root` for which `exclude` returns true is pruned along
/// with its subtree; `root` itself is always walked. Entries that cannot be
/// read are yielded as errors.
pub fn artifact_files<'a>(
    root: &Path,
    exclude: impl Fn(&Path) -> bool + 'a,
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| entry.depth() == 0 || !exclude(entry.path()))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) if is_artifact(entry.path()) => Some(Ok(entry.into_path())),
            Ok(entry) => {
                tracing::debug!("skipping {}", entry.path().display());
                None
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                Some(Err(Error::io("walk directory", path, e.into())))
            }
        })
}
