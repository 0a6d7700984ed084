use chime_error::{chime_error, ErrorType, Result};
use std::{io, path::Path};
use tokio::fs;

/// Delete a previous build's output
///
/// Returns whether there was anything to delete
pub async fn remove_stale(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(chime_error!(
            type = ErrorType::Cleanup,
            format!("Failed to remove \"{}\": {err}", path.display())
        )),
    }
}

/// Write the final CSS, replacing any existing content
pub async fn write(path: &Path, css: &str) -> Result<()> {
    fs::write(path, css).await.map_err(|err| {
        chime_error!(
            type = ErrorType::Write,
            format!("Failed to write \"{}\": {err}", path.display())
        )
    })
}
