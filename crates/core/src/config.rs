//! Parser configuration.
//!
//! Every field has a default, so an empty TOML file is a valid configuration.
//! CLI flags override file values, which override defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::TermCalendar;
use crate::error::{CoreError, Result};

/// Default vertical bucket size; absorbs ±1 unit of rendering jitter.
pub const DEFAULT_ROW_BUCKET: f32 = 2.0;

/// Which column interpretation(s) to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Run both interpretations and keep the higher-scoring one.
    #[default]
    Auto,
    /// Always split pages at the horizontal midpoint.
    Split,
    /// Always treat each page as a single column.
    Single,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Auto => write!(f, "auto"),
            LayoutMode::Split => write!(f, "split"),
            LayoutMode::Single => write!(f, "single"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(LayoutMode::Auto),
            "split" => Ok(LayoutMode::Split),
            "single" => Ok(LayoutMode::Single),
            other => Err(format!(
                "unknown layout {:?} (expected auto, split or single)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Vertical bucket size used to group tokens into rows.
    pub row_bucket: f32,
    pub layout: LayoutMode,
    pub calendar: TermCalendar,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            row_bucket: DEFAULT_ROW_BUCKET,
            layout: LayoutMode::default(),
            calendar: TermCalendar::default(),
        }
    }
}

impl ParserConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ParserConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.row_bucket.is_finite() || self.row_bucket <= 0.0 {
            return Err(CoreError::config(format!(
                "row_bucket must be a positive number, got {}",
                self.row_bucket
            )));
        }
        self.calendar.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ParserConfig::from_toml_str("").unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ParserConfig::from_toml_str("row_bucket = 3.0\nlayout = \"single\"\n").unwrap();
        assert!((config.row_bucket - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.layout, LayoutMode::Single);
        assert_eq!(config.calendar, TermCalendar::default());
    }

    #[test]
    fn test_rejects_non_positive_bucket() {
        assert!(ParserConfig::from_toml_str("row_bucket = 0.0").is_err());
        assert!(ParserConfig::from_toml_str("row_bucket = -1.0").is_err());
    }

    #[test]
    fn test_rejects_unknown_layout() {
        assert!(ParserConfig::from_toml_str("layout = \"triple\"").is_err());
    }

    #[test]
    fn test_custom_calendar_without_winter() {
        let toml = r#"
[[calendar.terms]]
name = "Spring"
code_suffix = "10"
previous = { term = "Fall", year_offset = -1 }
next = { term = "Fall" }

[[calendar.terms]]
name = "Fall"
code_suffix = "30"
previous = { term = "Spring" }
next = { term = "Spring", year_offset = 1 }
"#;
        let config = ParserConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.calendar.terms.len(), 2);
        assert_eq!(
            config.calendar.decode_code("202430").as_deref(),
            Some("Fall 2024")
        );
        assert_eq!(
            config.calendar.predecessor("Fall 2024").as_deref(),
            Some("Spring 2024")
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ParserConfig::default();
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(ParserConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout = \"split\"").unwrap();
        let config = ParserConfig::load(file.path()).unwrap();
        assert_eq!(config.layout, LayoutMode::Split);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ParserConfig::load(Path::new("/nonexistent/transcript.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn test_layout_mode_from_str() {
        assert_eq!("Split".parse::<LayoutMode>().unwrap(), LayoutMode::Split);
        assert_eq!(LayoutMode::Single.to_string(), "single");
        assert!("both".parse::<LayoutMode>().is_err());
    }
}
