//! INI file configuration adapter.

use crate::domain::error::ForecastError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| ForecastError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ForecastError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ForecastError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{ProviderSource, Settings};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[provider]
source = csv
csv_dir = ./data

[web]
listen = 127.0.0.1:8080
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("provider", "source"), Some("csv".to_string()));
        assert_eq!(adapter.get_string("provider", "csv_dir"), Some("./data".to_string()));
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("127.0.0.1:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[web]\nlisten = 0.0.0.0:8000\n").unwrap();
        assert_eq!(adapter.get_string("web", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_and_sections_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Provider]\nSource = yahoo\n").unwrap();
        assert_eq!(adapter.get_string("provider", "source"), Some("yahoo".to_string()));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[provider]\ntimeout_secs = 15\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("provider", "timeout_secs"), Some("15".to_string()));
    }

    #[test]
    fn from_file_returns_parse_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/nextclose.ini").unwrap_err();
        assert!(matches!(err, ForecastError::ConfigParse { ref file, .. } if file.contains("nextclose.ini")));
    }

    #[test]
    fn feeds_settings_validation() {
        let content = r#"
[provider]
source = yahoo
base_url = http://localhost:9000/v8/finance/chart
timeout_secs = 3

[web]
listen = 127.0.0.1:8001
request_timeout_secs = 12
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        let settings = Settings::from_config(&adapter).unwrap();

        assert_eq!(settings.provider.source, ProviderSource::Yahoo);
        assert_eq!(settings.provider.base_url, "http://localhost:9000/v8/finance/chart");
        assert_eq!(settings.provider.timeout, Duration::from_secs(3));
        assert_eq!(settings.web.listen.port(), 8001);
        assert_eq!(settings.web.request_timeout, Duration::from_secs(12));
    }
}
