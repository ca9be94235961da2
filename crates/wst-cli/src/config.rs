use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use wst_core::models::roster::DEFAULT_PATIENT_COUNT;
use wst_export::output::write_atomic_sync;
use wst_export::styles::DocumentStyles;
use wst_export::template::TemplateNames;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WstConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Patients per scoresheet.
    #[serde(default = "default_patient_count")]
    pub patient_count: usize,
    /// Site-specific skill list. `None` uses the 30 standard WST items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub templates: TemplateConfig,
    /// Where generated reports are saved.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub styles: DocumentStyles,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub location: TemplateLocation,
    #[serde(default)]
    pub names: TemplateNames,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateLocation {
    Directory { path: PathBuf },
    Http { base_url: String },
}

impl Default for TemplateLocation {
    fn default() -> Self {
        TemplateLocation::Directory {
            path: PathBuf::from("templates"),
        }
    }
}

fn default_patient_count() -> usize {
    DEFAULT_PATIENT_COUNT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for WstConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            patient_count: default_patient_count(),
            skills: None,
            templates: TemplateConfig::default(),
            output_dir: default_output_dir(),
            styles: DocumentStyles::default(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("wst"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or defaults when the file does not exist.
pub fn load_config(path: &Path) -> eyre::Result<WstConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(WstConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: WstConfig = serde_json::from_value(migrated)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &WstConfig) -> eyre::Result<()> {
    if config.patient_count == 0 {
        return Err(eyre::eyre!("patient_count must be at least 1"));
    }
    Ok(())
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update wst."
        ));
    }

    // v0 → v1: flat `template_dir` moves under `templates.location`;
    // `created_at` is stamped if it was never recorded.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(dir) = obj.remove("template_dir") {
            obj.insert(
                "templates".to_string(),
                serde_json::json!({ "location": { "type": "directory", "path": dir } }),
            );
        }
        obj.entry("created_at")
            .or_insert(serde_json::Value::String(jiff::Timestamp::now().to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (nested template location)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &WstConfig) -> eyre::Result<()> {
    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Temp files start out 0o600, so the saved config is private too.
    write_atomic_sync(path, json.as_bytes())?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
