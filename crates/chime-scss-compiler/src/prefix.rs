use chime_config::{compiler::OutputStyle, prefixer::Configuration};
use chime_error::{chime_error, ErrorType, Result};
use lightningcss::{
    stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet},
    targets::{Browsers, Targets},
};
use smol_str::SmolStr;
use std::sync::{Arc, RwLock};

/// Indentation width of the non-minified printer output
const PRINTER_INDENT: usize = 2;

#[derive(Debug)]
pub struct Prefixed {
    pub css: String,
    /// Non-fatal diagnostics from parsing the input
    pub warnings: Vec<String>,
}

/// Adds vendor prefixes for the configured browser targets
#[derive(Debug)]
pub struct Prefixer {
    targets: Targets,
    minify: bool,
}

impl Prefixer {
    pub fn new(config: &Configuration, style: OutputStyle) -> Result<Self> {
        let browsers = Browsers::from_browserslist(config.browsers.iter().map(SmolStr::as_str))
            .map_err(|err| chime_error!(format!("Invalid browser query: {err}")))?;

        Ok(Self {
            targets: browsers.map(Targets::from).unwrap_or_default(),
            minify: style == OutputStyle::Compressed,
        })
    }

    /// Parse, prefix and re-serialize the CSS
    ///
    /// Rules the parser can't make sense of are dropped and reported as warnings
    pub fn process(&self, filename: &str, css: &str) -> Result<Prefixed> {
        let warnings = Arc::new(RwLock::new(Vec::new()));
        let parser_options = ParserOptions {
            filename: filename.to_owned(),
            error_recovery: true,
            warnings: Some(Arc::clone(&warnings)),
            ..ParserOptions::default()
        };

        let mut stylesheet = StyleSheet::parse(css, parser_options)
            .map_err(|err| chime_error!(type = ErrorType::PostProcess, err.to_string()))?;
        stylesheet
            .minify(MinifyOptions {
                targets: self.targets,
                ..MinifyOptions::default()
            })
            .map_err(|err| chime_error!(type = ErrorType::PostProcess, err.to_string()))?;

        let output = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|err| chime_error!(type = ErrorType::PostProcess, err.to_string()))?;

        let warnings = warnings
            .read()
            .map(|warnings| warnings.iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        Ok(Prefixed {
            css: output.code,
            warnings,
        })
    }
}

/// Scale the printer's indentation to `width` spaces per level
#[must_use]
pub fn reindent(css: &str, width: usize) -> String {
    if width == PRINTER_INDENT {
        return css.to_owned();
    }

    let mut out = String::with_capacity(css.len() + css.len() / 4);
    for line in css.split_inclusive('\n') {
        let content = line.trim_start_matches(' ');
        let depth = (line.len() - content.len()) / PRINTER_INDENT;
        out.extend(std::iter::repeat(' ').take(depth * width));
        out.push_str(content);
    }

    out
}
