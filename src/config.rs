use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::schedule::numbering::DEFAULT_NUMBERING_START;
use crate::schedule::stock::DEFAULT_STOCK_STATUSES;
use crate::schedule::sync::{DEFAULT_LOOKAHEAD_MONTHS, DEFAULT_START_ID};
use crate::schedule::{EpisodeStatus, SpeakerProfile, SpeakerSet, SyncOptions};

/// Year inference only resolves months within half a year of today.
pub const MAX_LOOKAHEAD_MONTHS: u32 = 5;

const CONFIG_ENV: &str = "NOTEBOOK_CONFIG";
const APP_DIR: &str = ".production-notebook";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    /// SQLite file holding the sheet. Relative paths resolve against the
    /// config file's directory.
    pub sheet_path: PathBuf,
    pub numbering_start: u32,
    pub default_start_id: u32,
    pub lookahead_months: u32,
    pub stock_statuses: Vec<EpisodeStatus>,
    pub speakers: SpeakersConfig,
    pub narration_tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakersConfig {
    pub a: SpeakerProfile,
    pub b: SpeakerProfile,
}

impl Default for SpeakersConfig {
    fn default() -> Self {
        Self {
            a: SpeakerProfile::new("Tomomi", &["赤", "Tomomi"], "red-text"),
            b: SpeakerProfile::new("道ゐ", &["青", "道ゐ"], "blue-text"),
        }
    }
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            sheet_path: app_dir().join("notebook.db"),
            numbering_start: DEFAULT_NUMBERING_START,
            default_start_id: DEFAULT_START_ID,
            lookahead_months: DEFAULT_LOOKAHEAD_MONTHS,
            stock_statuses: DEFAULT_STOCK_STATUSES.to_vec(),
            speakers: SpeakersConfig::default(),
            narration_tokens: vec!["黒".to_string()],
        }
    }
}

impl NotebookConfig {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            lookahead_months: self.lookahead_months,
            default_start_id: self.default_start_id,
        }
    }

    pub fn speaker_set(&self) -> Result<SpeakerSet, AppError> {
        SpeakerSet::new(
            self.speakers.a.clone(),
            self.speakers.b.clone(),
            &self.narration_tokens,
        )
        .map_err(|e| AppError::Config(format!("invalid speaker token: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        let config: NotebookConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.lookahead_months > MAX_LOOKAHEAD_MONTHS {
            return Err(AppError::Config(format!(
                "lookahead_months must be at most {}, got {}",
                MAX_LOOKAHEAD_MONTHS, self.lookahead_months
            )));
        }
        if self.numbering_start == 0 {
            return Err(AppError::Config("numbering_start must be positive".into()));
        }
        if self.stock_statuses.is_empty() {
            log::warn!("stock_statuses is empty; stock will always be zero");
        }
        Ok(())
    }
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `NOTEBOOK_CONFIG` if set, otherwise `~/.production-notebook/config.yaml`.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV) {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => app_dir().join("config.yaml"),
    }
}

/// Load config from `path`, falling back to defaults when the file does not
/// exist.
pub fn load_config(path: &Path) -> Result<NotebookConfig, AppError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(NotebookConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    let mut config = NotebookConfig::from_yaml(&content).map_err(|e| match e {
        AppError::Config(msg) => AppError::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    if config.sheet_path.is_relative() {
        if let Some(dir) = path.parent() {
            config.sheet_path = dir.join(&config.sheet_path);
        }
    }

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = NotebookConfig::default();
        assert_eq!(config.numbering_start, 48);
        assert_eq!(config.default_start_id, 85);
        assert_eq!(config.lookahead_months, 2);
        assert_eq!(
            config.stock_statuses,
            vec![EpisodeStatus::Edited, EpisodeStatus::Published]
        );
        assert!(config.speaker_set().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = NotebookConfig::from_yaml(
            "lookahead_months: 3\nstock_statuses: [撮影済, 編集済, UP済]\n",
        )
        .unwrap();
        assert_eq!(config.lookahead_months, 3);
        assert_eq!(config.stock_statuses.len(), 3);
        assert_eq!(config.numbering_start, 48);
        assert_eq!(config.speakers.a.display_name, "Tomomi");
    }

    #[test]
    fn test_speakers_from_yaml() {
        let yaml = r#"
speakers:
  a: { display_name: Alice, tokens: [A], style: red-text }
  b: { display_name: Bob, tokens: [B, Bobby], style: blue-text }
"#;
        let config = NotebookConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.speakers.b.tokens, vec!["B", "Bobby"]);
    }

    #[test]
    fn test_lookahead_too_large_rejected() {
        let result = NotebookConfig::from_yaml("lookahead_months: 6\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = NotebookConfig::from_yaml("stock_statuses: [完成]\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("nope.yaml")).unwrap();
        assert_eq!(config.default_start_id, 85);
    }

    #[test]
    fn test_relative_sheet_path_resolves_next_to_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "sheet_path: data/sheet.db\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.sheet_path, temp.path().join("data").join("sheet.db"));
    }
}
