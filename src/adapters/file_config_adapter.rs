//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[backtest]
capital = 25000
commission = 0.001
policy = next_open
shorting = yes
"#;

    #[test]
    fn from_string_parses_sections() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            config.get_string("backtest", "policy"),
            Some("next_open".to_string())
        );
    }

    #[test]
    fn numeric_getters_with_defaults() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(config.get_int("backtest", "capital", 0), 25_000);
        assert!((config.get_double("backtest", "commission", 0.0) - 0.001).abs() < 1e-12);
        assert_eq!(config.get_int("backtest", "missing", 7), 7);
        assert!((config.get_double("missing", "missing", 1.5) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn bool_getter() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert!(config.get_bool("backtest", "shorting", false));
        assert!(!config.get_bool("backtest", "missing", false));
    }

    #[test]
    fn from_file_roundtrip() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let config = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(config.get_int("backtest", "capital", 0), 25_000);
    }

    #[test]
    fn malformed_content_errors() {
        assert!(FileConfigAdapter::from_string("[unclosed").is_err());
    }
}
