use crate::domain::constants::{
    DEFAULT_CONTRACT_TAG, DEFAULT_DATA_DIR, DEFAULT_FORM_ID_ATTRIBUTE, DEFAULT_FORM_TAG,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub compare: CompareConfig,
}

/// Which elements identify a document, and where batch mode looks for
/// inputs. CLI flags override file values, file values override defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct CompareConfig {
    #[serde(default = "default_form_tag")]
    pub form_tag: String,
    #[serde(default = "default_form_id_attribute")]
    pub form_id_attribute: String,
    #[serde(default = "default_contract_tag")]
    pub contract_tag: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            form_tag: default_form_tag(),
            form_id_attribute: default_form_id_attribute(),
            contract_tag: default_contract_tag(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_form_tag() -> String {
    DEFAULT_FORM_TAG.to_string()
}

fn default_form_id_attribute() -> String {
    DEFAULT_FORM_ID_ATTRIBUTE.to_string()
}

fn default_contract_tag() -> String {
    DEFAULT_CONTRACT_TAG.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Load the compare configuration. A missing file yields defaults; a
/// present but malformed file is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<CompareConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let home = std::env::var("HOME")?;
            PathBuf::from(home).join(".config/formdiff/config.toml")
        }
    };
    if !path.exists() {
        return Ok(CompareConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&raw)?;
    Ok(file.compare)
}
