//! Settings persistence
//!
//! Saves the non-secret part of an adapter's configuration so it can be
//! rebuilt in a later process. The API key and the content formatter are
//! never written; they must be supplied again when the settings are loaded
//! (see [`crate::builder::AzureMlBuilder::from_settings`]).
//!
//! The file format follows the extension: `.yaml`/`.yml` or `.json`.

use crate::defaults::LLM_TYPE;
use crate::error::LlmError;
use crate::formatters::ModelKwargs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Persisted adapter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Adapter type tag, always `azureml_endpoint`.
    #[serde(rename = "_type")]
    pub llm_type: String,
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default)]
    pub deployment_name: String,
    #[serde(default)]
    pub model_kwargs: ModelKwargs,
    /// Request timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ModelSettings {
    pub fn new(endpoint_url: impl Into<String>, deployment_name: impl Into<String>) -> Self {
        Self {
            llm_type: LLM_TYPE.to_string(),
            endpoint_url: endpoint_url.into(),
            deployment_name: deployment_name.into(),
            model_kwargs: ModelKwargs::new(),
            timeout_ms: None,
        }
    }

    pub fn with_model_kwargs(mut self, model_kwargs: ModelKwargs) -> Self {
        self.model_kwargs = model_kwargs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Yaml,
    Json,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> Result<Self, LlmError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(LlmError::ConfigurationError(format!(
                "{} must have a .yaml, .yml or .json extension",
                path.display()
            ))),
        }
    }
}

/// Write `settings` to `path`, creating parent directories as needed.
pub fn save_settings(settings: &ModelSettings, path: impl AsRef<Path>) -> Result<(), LlmError> {
    let path = path.as_ref();
    let contents = match SettingsFormat::from_path(path)? {
        SettingsFormat::Yaml => serde_yaml::to_string(settings)?,
        SettingsFormat::Json => serde_json::to_string_pretty(settings)
            .map_err(|e| LlmError::SerializationError(e.to_string()))?,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    tracing::debug!(path = %path.display(), "saved endpoint settings");
    Ok(())
}

/// Read settings from `path`.
///
/// Fails when the file was written for a different adapter type.
pub fn load_settings(path: impl AsRef<Path>) -> Result<ModelSettings, LlmError> {
    let path = path.as_ref();
    let format = SettingsFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    let settings: ModelSettings = match format {
        SettingsFormat::Yaml => serde_yaml::from_str(&contents)?,
        SettingsFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| LlmError::SerializationError(e.to_string()))?,
    };

    if settings.llm_type != LLM_TYPE {
        return Err(LlmError::ConfigurationError(format!(
            "settings in {} are for '{}', expected '{LLM_TYPE}'",
            path.display(),
            settings.llm_type
        )));
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ModelSettings {
        let mut kwargs = ModelKwargs::new();
        kwargs.insert("temperature".into(), json!(0.03));
        kwargs.insert("top_p".into(), json!(0.4));
        kwargs.insert("max_tokens".into(), json!(200));
        ModelSettings::new("https://example.invalid/score", "blue").with_model_kwargs(kwargs)
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("azureml.yaml");
        save_settings(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("_type: azureml_endpoint"));
        assert_eq!(load_settings(&path).unwrap(), sample());
    }

    #[test]
    fn json_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("azureml.json");
        let settings = sample().with_timeout(Some(Duration::from_millis(1500)));
        save_settings(&settings, &path).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_settings(&sample(), dir.path().join("azureml.toml")).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn foreign_type_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.yaml");
        std::fs::write(&path, "_type: openai\nendpoint_url: x\n").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LlmError::IoError(_)));
    }
}
