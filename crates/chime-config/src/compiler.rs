use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMap {
    /// Append the map as a base64 data URL comment
    #[default]
    Embed,
    None,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Configuration {
    pub style: OutputStyle,
    pub indent_width: usize,
    pub source_map: SourceMap,
    /// Extra directories searched for `@import`/`@use` targets
    pub load_paths: Vec<PathBuf>,
    /// Package directories searched after the load paths (and for `~` imports)
    pub package_dirs: Vec<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            style: OutputStyle::Expanded,
            indent_width: 4,
            source_map: SourceMap::Embed,
            load_paths: Vec::new(),
            package_dirs: vec![PathBuf::from("node_modules")],
        }
    }
}
