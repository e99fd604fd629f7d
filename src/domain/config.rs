use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for coverage rule generation.
///
/// Holds default locations of the input inventories, so they don't have to
/// be passed on every invocation, and settings for the text summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Default path of the build metadata list.
    pub build_metadata_list: Option<PathBuf>,

    /// Default path of the flat config list.
    pub flat_config_list: Option<PathBuf>,

    /// Default path of the DUT attribute list.
    pub dut_attribute_list: Option<PathBuf>,

    /// Spaces between columns of the text summary.
    ///
    /// Each column is padded to the width of its widest cell plus this many
    /// spaces.
    summary_padding: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_metadata_list: None,
            flat_config_list: None,
            dut_attribute_list: None,
            summary_padding: default_summary_padding(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the column padding of the text summary.
    #[must_use]
    pub const fn summary_padding(&self) -> usize {
        self.summary_padding
    }

    /// Sets the column padding of the text summary.
    pub const fn set_summary_padding(&mut self, padding: usize) {
        self.summary_padding = padding;
    }
}

const fn default_summary_padding() -> usize {
    4
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        build_metadata_list: Option<PathBuf>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        flat_config_list: Option<PathBuf>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        dut_attribute_list: Option<PathBuf>,

        #[serde(default = "default_summary_padding")]
        summary_padding: usize,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                build_metadata_list,
                flat_config_list,
                dut_attribute_list,
                summary_padding,
            } => Self {
                build_metadata_list,
                flat_config_list,
                dut_attribute_list,
                summary_padding,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            build_metadata_list: config.build_metadata_list,
            flat_config_list: config.flat_config_list,
            dut_attribute_list: config.dut_attribute_list,
            summary_padding: config.summary_padding,
        }
    }
}
