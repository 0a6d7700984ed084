use crate::importer::PackageLoader;
use chime_config::compiler::{Configuration, OutputStyle};
use chime_error::{chime_error, ErrorType, Result, ResultExt};
use rsass::{
    input::{Context, SourceFile, SourceName},
    output::{Format, Style},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub struct CompiledStylesheet {
    pub css: String,
    /// Stylesheet source as read from disk
    pub source: String,
}

/// SCSS to CSS compiler with package-aware import resolution
#[derive(Debug)]
pub struct Compiler {
    format: Format,
    load_paths: Vec<PathBuf>,
    package_dirs: Vec<PathBuf>,
}

impl Compiler {
    #[must_use]
    pub fn new(config: &Configuration) -> Self {
        let style = match config.style {
            OutputStyle::Expanded => Style::Expanded,
            OutputStyle::Compressed => Style::Compressed,
        };

        Self {
            format: Format {
                style,
                ..Default::default()
            },
            load_paths: config.load_paths.clone(),
            package_dirs: config.package_dirs.clone(),
        }
    }

    /// Compile the stylesheet at `path`
    ///
    /// Blocking. Errors carry the compiler's formatted message (position and reason).
    pub fn compile(&self, path: &Path) -> Result<CompiledStylesheet> {
        info!("Compiling \"{}\" into CSS", path.display());

        let source = fs::read_to_string(path).map_err(|err| {
            chime_error!(
                type = ErrorType::Compile,
                format!("Failed to read \"{}\": {err}", path.display())
            )
        })?;

        let name = path.display().to_string();
        let loader = PackageLoader::for_source(&name, &self.load_paths, &self.package_dirs);
        let file = SourceFile::scss_bytes(source.as_bytes(), SourceName::root(name));

        let compiled = Context::for_loader(loader)
            .with_format(self.format)
            .transform(file)
            .map_err(|err| chime_error!(type = ErrorType::Compile, err.to_string()))?;
        let css = String::from_utf8(compiled).with_error_type(ErrorType::Compile)?;

        Ok(CompiledStylesheet { css, source })
    }
}

#[cfg(test)]
mod test {
    use super::Compiler;
    use chime_config::compiler::{Configuration, OutputStyle};
    use chime_error::ErrorType;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn nested_rules_and_partials() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_vars.scss"), "$gap: 8px;").unwrap();
        let source = "@import \"vars\";\n.card { .title { margin: $gap * 2; } }\n";
        fs::write(dir.path().join("card.scss"), source).unwrap();

        let compiler = Compiler::new(&Configuration::default());
        let compiled = compiler.compile(&dir.path().join("card.scss")).unwrap();

        assert!(compiled.css.contains(".card .title {"));
        assert!(compiled.css.contains("margin: 16px;"));
        assert_eq!(compiled.source, source);
    }

    #[test]
    fn compressed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.scss"), ".a {\n  .b { color: red; }\n}\n").unwrap();

        let compiler = Compiler::new(&Configuration {
            style: OutputStyle::Compressed,
            ..Configuration::default()
        });
        let compiled = compiler.compile(&dir.path().join("a.scss")).unwrap();

        assert!(!compiled.css.trim_end().contains('\n'));
        assert!(compiled.css.contains(".a .b{"));
    }

    #[test]
    fn undefined_variable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.scss"), ".a { color: $nope; }\n").unwrap();

        let err = Compiler::new(&Configuration::default())
            .compile(&dir.path().join("broken.scss"))
            .unwrap_err();

        assert_eq!(err.error_type(), ErrorType::Compile);
        assert!(err.to_string().contains("Undefined variable"));
    }

    #[test]
    fn missing_source() {
        let dir = TempDir::new().unwrap();
        let err = Compiler::new(&Configuration::default())
            .compile(&dir.path().join("gone.scss"))
            .unwrap_err();

        assert_eq!(err.error_type(), ErrorType::Compile);
        assert!(err.to_string().contains("gone.scss"));
    }
}
