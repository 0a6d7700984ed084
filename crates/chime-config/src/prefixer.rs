use serde::Deserialize;
use smol_str::SmolStr;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Configuration {
    /// Browserslist queries selecting the browsers to add prefixes for
    pub browsers: Vec<SmolStr>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            browsers: vec![SmolStr::new_static("defaults")],
        }
    }
}
