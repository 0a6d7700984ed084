use crate::job::is_stylesheet;
use chime_error::{bail, chime_error, ErrorType, Result, ResultExt};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|err| {
        chime_error!(
            type = ErrorType::Discovery,
            format!("Failed to read \"{}\": {err}", root.display())
        )
    })?;
    if !metadata.is_dir() {
        bail!(
            type = ErrorType::Discovery,
            format!("\"{}\" is not a directory", root.display())
        );
    }

    // Symlinks are followed, entries that are neither files nor directories are skipped
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => (entry.file_type().is_file() && is_stylesheet(entry.path()))
                .then(|| Ok(entry.into_path())),
            Err(err) => Some(Err(err)),
        })
        .inspect(|path| {
            if let Ok(path) = path {
                debug!(path = %path.display(), "discovered stylesheet");
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .with_error_type(ErrorType::Discovery)
}

/// Recursively collect every stylesheet source below `root`
///
/// Fails if `root` isn't a readable directory or any part of the tree can't be read
pub async fn find_stylesheets<P>(root: P) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let root = root.as_ref().to_path_buf();
    chime_blocking::io(move || walk(&root))
        .await
        .with_error_type(ErrorType::Discovery)?
}
