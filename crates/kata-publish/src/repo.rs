use std::path::{Path, PathBuf};

use crate::error::PublishError;

/// Canonical root of the git work tree at `dir`.
///
/// `dir` must be the root itself. A plain directory that merely sits inside
/// some other repository is rejected, as are bare repositories.
pub fn open_work_tree(dir: &Path) -> Result<PathBuf, PublishError> {
    let not_a_repository = || PublishError::NotAVersionControlDirectory(dir.to_path_buf());

    let root = dir.canonicalize().map_err(|_| not_a_repository())?;
    let repo = gix::discover(&root).map_err(|_| not_a_repository())?;
    let work_dir = repo
        .work_dir()
        .ok_or_else(not_a_repository)?
        .canonicalize()
        .map_err(|_| not_a_repository())?;

    if work_dir == root {
        Ok(root)
    } else {
        tracing::debug!(
            dir = %root.display(),
            enclosing = %work_dir.display(),
            "directory is inside another repository, not a work tree root"
        );
        Err(not_a_repository())
    }
}

/// `store` as a pathspec relative to the canonical `work_tree`.
///
/// Relative store paths resolve against the current directory, the same way
/// the store itself was written.
pub fn store_pathspec(work_tree: &Path, store: &Path) -> Result<String, PublishError> {
    let outside = || PublishError::StoreOutsideWorkTree {
        store: store.to_path_buf(),
        work_tree: work_tree.to_path_buf(),
    };

    let file_name = store.file_name().ok_or_else(outside)?;
    let parent = match store.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = parent.canonicalize().map_err(|source| PublishError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    let absolute = parent.join(file_name);
    let relative = absolute.strip_prefix(work_tree).map_err(|_| outside())?;
    Ok(relative.to_string_lossy().into_owned())
}
