use chime_error::Result;
use serde::Serialize;
use std::path::Path;

const DATA_URL_PREFIX: &str = "data:application/json;charset=utf-8;base64,";

/// Version 3 source map carrying the stylesheet source
///
/// The compiler doesn't track positions, so `mappings` stays empty and the source is only
/// referenced and embedded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMap<'a> {
    version: u8,
    file: &'a str,
    sources: [&'a str; 1],
    sources_content: [&'a str; 1],
    names: [&'a str; 0],
    mappings: &'a str,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
}

/// Append the source map as a base64 data URL comment
///
/// Output and source are siblings, so the source is referenced by its file name
pub fn embed(css: &mut String, output_path: &Path, source_path: &Path, source: &str) -> Result<()> {
    let file = file_name(output_path);
    let source_name = file_name(source_path);
    let map = SourceMap {
        version: 3,
        file: &file,
        sources: [&source_name],
        sources_content: [source],
        names: [],
        mappings: "",
    };

    let encoded = base64_simd::STANDARD.encode_to_string(sonic_rs::to_string(&map)?);
    if !css.is_empty() && !css.ends_with('\n') {
        css.push('\n');
    }
    css.push_str("/*# sourceMappingURL=");
    css.push_str(DATA_URL_PREFIX);
    css.push_str(&encoded);
    css.push_str(" */\n");

    Ok(())
}
