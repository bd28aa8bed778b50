use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    memory::{Address, Word},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ram_size: usize,
    pub cache_size: usize,
    pub line_size: usize,
    pub start: Address,
    pub preload: Vec<Word>,
    pub report_misses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ram_size: 4096,
            cache_size: 128,
            line_size: 16,
            start: 0,
            preload: vec![110, 130],
            report_misses: true,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Inline JSON wins over a config file; with neither, the defaults are used.
    pub fn load(json: Option<&str>, path: Option<&Path>) -> Result<Self> {
        let config = match (json, path) {
            (Some(json), _) => Config::from_json(json)?,
            (None, Some(path)) => Config::from_json(&fs::read_to_string(path)?)?,
            (None, None) => Config::default(),
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_override() {
        let config = Config::from_json(r#"{"cache_size": 256, "preload": [5, 9]}"#).unwrap();
        assert_eq!(config.cache_size, 256);
        assert_eq!(config.preload, vec![5, 9]);
        assert_eq!(config.line_size, 16);
        assert!(config.report_misses);
    }

    #[test]
    fn load_sources() {
        assert_eq!(Config::load(None, None).unwrap(), Config::default());
        let config =
            Config::load(Some(r#"{"start": 4}"#), Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(config.start, 4);
    }

    #[test]
    fn load_failures_are_errors() {
        assert!(matches!(
            Config::load(Some(r#"{"bogus": 1}"#), None),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::load(None, Some(Path::new("/nonexistent/config.json"))),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(Config::from_json(r#"{"ways": 2}"#).is_err());
    }
}
