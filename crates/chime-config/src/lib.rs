pub mod compiler;
pub mod prefixer;

use serde::Deserialize;
use std::{
    num::NonZero,
    path::{Path, PathBuf},
};
use tokio::fs;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Configuration {
    /// Root of the tree searched for stylesheet sources
    pub source_dir: PathBuf,
    /// Stylesheets built in addition to the discovered ones
    pub extra_files: Vec<PathBuf>,
    /// Exit with a failure status if any stylesheet failed to build
    pub fail_on_error: bool,
    pub compile_threads: Option<NonZero<usize>>,
    pub compiler: compiler::Configuration,
    pub prefixer: prefixer::Configuration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("example"),
            extra_files: vec![PathBuf::from("chime.scss")],
            fail_on_error: false,
            compile_threads: None,
            compiler: compiler::Configuration::default(),
            prefixer: prefixer::Configuration::default(),
        }
    }
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        toml::from_str(&content).map_err(eyre::Report::from)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        compiler::{OutputStyle, SourceMap},
        Configuration,
    };
    use std::{fs, num::NonZero, path::Path};
    use tempfile::TempDir;

    #[test]
    fn empty_document_is_default() {
        let config: Configuration = toml::from_str("").unwrap();

        assert_eq!(config.source_dir, Path::new("example"));
        assert_eq!(config.extra_files, [Path::new("chime.scss")]);
        assert!(!config.fail_on_error);
        assert_eq!(config.compiler.style, OutputStyle::Expanded);
        assert_eq!(config.compiler.indent_width, 4);
        assert_eq!(config.compiler.source_map, SourceMap::Embed);
        assert_eq!(config.prefixer.browsers, ["defaults"]);
    }

    #[test]
    fn partial_tables() {
        let config: Configuration = toml::from_str(
            r#"
            source-dir = "styles"
            compile-threads = 2

            [compiler]
            style = "compressed"
            source-map = "none"

            [prefixer]
            browsers = ["safari >= 10", "ie 11"]
            "#,
        )
        .unwrap();

        assert_eq!(config.source_dir, Path::new("styles"));
        assert_eq!(config.compile_threads.map(NonZero::get), Some(2));
        assert_eq!(config.compiler.style, OutputStyle::Compressed);
        assert_eq!(config.compiler.source_map, SourceMap::None);
        assert_eq!(config.compiler.indent_width, 4);
        assert_eq!(config.prefixer.browsers, ["safari >= 10", "ie 11"]);
    }

    #[test]
    fn import_search_paths() {
        let config: Configuration = toml::from_str(
            r#"
            [compiler]
            load-paths = ["shared"]
            package-dirs = ["vendor", "node_modules"]
            "#,
        )
        .unwrap();

        assert_eq!(config.compiler.load_paths, [Path::new("shared")]);
        assert_eq!(
            config.compiler.package_dirs,
            [Path::new("vendor"), Path::new("node_modules")]
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<Configuration>("source-directory = \"x\"").is_err());
        assert!(toml::from_str::<Configuration>("compile-threads = 0").is_err());
    }

    #[tokio::test]
    async fn load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chime.toml");
        fs::write(&path, "fail-on-error = true\nextra-files = []\n").unwrap();

        let config = Configuration::load(&path).await.unwrap();
        assert!(config.fail_on_error);
        assert!(config.extra_files.is_empty());

        assert!(Configuration::load(dir.path().join("missing.toml"))
            .await
            .is_err());
    }
}
