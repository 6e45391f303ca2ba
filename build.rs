use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG).expect("default_config.toml is readable");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("{DEFAULT_CONFIG} is not valid TOML: {e}"),
    };

    // The segmenter cannot fall back silently to another fence language.
    let language = table
        .get("segmenter")
        .and_then(|s| s.get("fence_language"))
        .and_then(|l| l.as_str());
    if language.is_none() {
        panic!("{DEFAULT_CONFIG} must set segmenter.fence_language");
    }
}
