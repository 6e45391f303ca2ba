use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::parser::{DEFAULT_LANGUAGE, Segmenter};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Absolute Typst lengths and `em`, e.g. `11pt`, `3.5mm`.
static LENGTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?(pt|mm|cm|in|em)$").unwrap());

/// Hex colors accepted by Typst's `rgb("...")`.
static COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
});

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub emphasis: EmphasisConfig,
    pub code: CodeConfig,
    pub page: PageConfig,
    pub font: FontConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Tag that must follow the opening fence for a block to count as code.
    pub fence_language: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            fence_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmphasisConfig {
    pub color: String,
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            color: "#38bdf8".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodeConfig {
    pub fill: String,
    pub stroke: String,
    pub color: String,
    pub size: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            fill: "#1e293b".to_string(),
            stroke: "#334155".to_string(),
            color: "#22d3ee".to_string(),
            size: "10pt".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub size: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: "11pt".to_string(),
        }
    }
}

impl Config {
    /// The settings bundled with the crate.
    pub fn compiled_default() -> Self {
        // build.rs rejects an unparsable default_config.toml
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. A missing file yields the compiled defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes and colors that would only fail later inside Typst.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("font.size", &self.font.size),
            ("code.size", &self.code.size),
        ];
        for (key, value) in lengths {
            check_setting(&LENGTH_REGEX, key, value)?;
        }

        let colors = [
            ("emphasis.color", &self.emphasis.color),
            ("code.fill", &self.code.fill),
            ("code.stroke", &self.code.stroke),
            ("code.color", &self.code.color),
        ];
        for (key, value) in colors {
            check_setting(&COLOR_REGEX, key, value)?;
        }
        Ok(())
    }

    /// Segmenter for the configured fence language.
    pub fn segmenter(&self) -> Result<Segmenter> {
        Segmenter::new(&self.segmenter.fence_language)
    }
}

fn check_setting(pattern: &Regex, key: &'static str, value: &str) -> Result<()> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(Error::Setting {
            key,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn compiled_default_matches_code_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.segmenter.fence_language, "sql");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[segmenter]\nfence_language = \"postgres\"\n\n[page]\nnumbers = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.segmenter.fence_language, "postgres");
        assert!(config.page.numbers);
        assert_eq!(config.emphasis, EmphasisConfig::default());
        assert_eq!(config.segmenter().unwrap().language(), "postgres");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[page\nnumbers = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn defaults_are_valid() {
        Config::compiled_default().validate().unwrap();
    }

    #[test]
    fn bad_length_is_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[font]\nsize = \"11pt)\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Setting { key: "font.size", .. }));
    }

    #[test]
    fn bad_color_is_rejected() {
        let mut config = Config::default();
        config.code.fill = "navy".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Setting { key: "code.fill", ref value } if value == "navy"));

        config.code.fill = "#abc".to_string();
        config.code.size = "9.5pt".to_string();
        config.validate().unwrap();
    }
}
