use rsass::input::{LoadError, Loader};
use std::{
    fs::File,
    path::{self, Path, PathBuf},
    sync::Mutex,
};

const PACKAGE_DIR: &str = "node_modules";

/// Directory part of an import name, including the trailing slash
fn base_of(name: &str) -> &str {
    name.rfind('/').map_or("", |idx| &name[..=idx])
}

/// Import resolver that falls back to package directories
///
/// The compiler joins every import URL onto the directory of the importing stylesheet before
/// asking the loader, so a URL is first tried as-is (a sibling of the importer). Failing that,
/// the importer's directory is split off again and the rest is looked up in the load paths, then
/// in every package directory. A `~` segment skips both, `~bootstrap/scss/grid` only ever
/// resolves inside a package directory.
#[derive(Debug)]
pub struct PackageLoader {
    load_paths: Vec<PathBuf>,
    package_dirs: Vec<PathBuf>,
    /// Directories of the stylesheets opened so far, as the compiler names them
    bases: Mutex<Vec<String>>,
}

impl PackageLoader {
    /// Build a loader for one source file
    ///
    /// `source_name` is the name the source is handed to the compiler with. The package
    /// directories are the `node_modules` directory of every ancestor of the source (nearest
    /// first), followed by the configured ones.
    #[must_use]
    pub fn for_source(
        source_name: &str,
        load_paths: &[PathBuf],
        package_dirs: &[PathBuf],
    ) -> Self {
        let source = Path::new(source_name);
        let absolute_source = path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
        let ancestor_dirs = absolute_source
            .ancestors()
            .skip(1)
            .map(|dir| dir.join(PACKAGE_DIR));

        let mut loader_package_dirs: Vec<PathBuf> = Vec::new();
        for dir in ancestor_dirs.chain(package_dirs.iter().cloned()) {
            if !loader_package_dirs.contains(&dir) {
                loader_package_dirs.push(dir);
            }
        }

        Self {
            load_paths: load_paths.to_vec(),
            package_dirs: loader_package_dirs,
            bases: Mutex::new(vec![base_of(source_name).to_owned()]),
        }
    }

    #[must_use]
    pub fn package_dirs(&self) -> &[PathBuf] {
        &self.package_dirs
    }

    fn open(path: &Path) -> Result<Option<File>, LoadError> {
        if !path.is_file() {
            return Ok(None);
        }

        File::open(path)
            .map(Some)
            .map_err(|err| LoadError::Input(path.display().to_string(), err))
    }

    fn find_in(dirs: &[PathBuf], url: &str) -> Result<Option<File>, LoadError> {
        for dir in dirs {
            if let Some(file) = Self::open(&dir.join(url))? {
                trace!(%url, dir = %dir.display(), "resolved import");
                return Ok(Some(file));
            }
        }

        Ok(None)
    }

    fn record_base(&self, url: &str) {
        let base = base_of(url);
        if let Ok(mut bases) = self.bases.lock() {
            if !bases.iter().any(|known| known == base) {
                bases.push(base.to_owned());
            }
        }
    }

    /// Strip the longest known importer directory off the URL
    fn strip_base<'a>(&self, url: &'a str) -> &'a str {
        let Ok(bases) = self.bases.lock() else {
            return url;
        };

        bases
            .iter()
            .filter(|base| url.starts_with(base.as_str()))
            .map(String::len)
            .max()
            .map_or(url, |len| &url[len..])
    }
}

impl Loader for PackageLoader {
    type File = File;

    fn find_file(&self, url: &str) -> Result<Option<Self::File>, LoadError> {
        if let Some(idx) = url.rfind('~') {
            if idx == 0 || url[..idx].ends_with('/') {
                return Self::find_in(&self.package_dirs, &url[idx + 1..]);
            }
        }

        if let Some(file) = Self::open(Path::new(url))? {
            self.record_base(url);
            return Ok(Some(file));
        }

        let rest = self.strip_base(url);
        match Self::find_in(&self.load_paths, rest)? {
            Some(file) => Ok(Some(file)),
            None => Self::find_in(&self.package_dirs, rest),
        }
    }
}
