use chime_error::{bail, ErrorType, Result};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

pub const SOURCE_EXTENSION: &str = "scss";
pub const OUTPUT_EXTENSION: &str = "css";

#[inline]
#[must_use]
pub fn is_stylesheet(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(SOURCE_EXTENSION))
}

/// Swap the stylesheet extension for the CSS one
///
/// Returns `None` for paths that aren't stylesheet sources, since their output would overwrite them
#[must_use]
pub fn output_path_for(source: &Path) -> Option<PathBuf> {
    is_stylesheet(source).then(|| source.with_extension(OUTPUT_EXTENSION))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Discovered,
    CleanedOutput,
    Compiling,
    Compiled,
    PostProcessing,
    Writing,
    Written,
    Failed,
}

#[derive(Debug)]
pub struct StylesheetJob {
    source_path: PathBuf,
    output_path: PathBuf,
    state: JobState,
}

impl StylesheetJob {
    pub fn new(source_path: PathBuf) -> Result<Self> {
        let Some(output_path) = output_path_for(&source_path) else {
            bail!(
                type = ErrorType::Discovery,
                format!("\"{}\" is not a .{SOURCE_EXTENSION} file", source_path.display())
            );
        };

        Ok(Self {
            source_path,
            output_path,
            state: JobState::Discovered,
        })
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: JobState) {
        debug!(source = %self.source_path.display(), from = ?self.state, to = ?next, "job state changed");
        self.state = next;
    }
}

#[cfg(test)]
mod test {
    use super::{output_path_for, JobState, StylesheetJob};
    use chime_error::ErrorType;
    use std::path::{Path, PathBuf};

    #[test]
    fn swaps_extension() {
        assert_eq!(
            output_path_for(Path::new("chime.scss")),
            Some(PathBuf::from("chime.css"))
        );
        assert_eq!(
            output_path_for(Path::new("example/sub/deep/button.scss")),
            Some(PathBuf::from("example/sub/deep/button.css"))
        );
        assert_eq!(
            output_path_for(Path::new("example/v1.2/theme.scss")),
            Some(PathBuf::from("example/v1.2/theme.css"))
        );
    }

    #[test]
    fn only_stylesheets() {
        assert_eq!(output_path_for(Path::new("notes.txt")), None);
        assert_eq!(output_path_for(Path::new("theme.css")), None);
        assert_eq!(output_path_for(Path::new("theme.scss.bak")), None);
        assert_eq!(output_path_for(Path::new("scss")), None);
    }

    #[test]
    fn new_job() {
        let job = StylesheetJob::new(PathBuf::from("example/a.scss")).unwrap();
        assert_eq!(job.source_path(), Path::new("example/a.scss"));
        assert_eq!(job.output_path(), Path::new("example/a.css"));
        assert_eq!(job.state(), JobState::Discovered);

        let err = StylesheetJob::new(PathBuf::from("example/a.css")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Discovery);
    }
}
