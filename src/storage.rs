//! Loading and saving of input and output documents.
//!
//! Documents are JSON or YAML, selected by file extension (`.json`, `.yaml`
//! or `.yml`).

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

/// The document formats understood by [`load`] and [`save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON, using field names as they appear in the domain types.
    Json,
    /// YAML.
    Yaml,
}

impl Format {
    /// Determines the document format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedExtension`] if the extension is missing or not one
    /// of `json`, `yaml` or `yml`.
    pub fn from_path(path: &Path) -> Result<Self, UnsupportedExtension> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(UnsupportedExtension(path.display().to_string())),
        }
    }
}

/// The path does not have a recognised document extension.
#[derive(Debug, thiserror::Error)]
#[error("unsupported file extension for '{0}' (expected .json, .yaml or .yml)")]
pub struct UnsupportedExtension(String);

/// Errors that can occur when loading a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found")]
    NotFound,

    /// The file could not be read.
    #[error(transparent)]
    Io(io::Error),

    /// The file is not valid JSON for the requested type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The file is not valid YAML for the requested type.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// The file has an unrecognised extension.
    #[error(transparent)]
    UnsupportedExtension(#[from] UnsupportedExtension),
}

impl From<io::Error> for LoadError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(error),
        }
    }
}

/// Errors that can occur when saving a document.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The file could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The value could not be serialized as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The value could not be serialized as YAML.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// The file has an unrecognised extension.
    #[error(transparent)]
    UnsupportedExtension(#[from] UnsupportedExtension),
}

/// Loads a document from `path`.
///
/// # Errors
///
/// Returns an error if the extension is not recognised, the file cannot be
/// read, or its content does not deserialize into `T`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    tracing::debug!("Loaded {} bytes from {}", content.len(), path.display());
    parse(&content, format)
}

/// Deserializes `content` in the given format.
///
/// # Errors
///
/// Returns an error if the content does not deserialize into `T`.
pub fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, LoadError> {
    let value = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(value)
}

/// Saves `value` as a document at `path`, replacing any existing file.
///
/// JSON output is pretty-printed.
///
/// # Errors
///
/// Returns an error if the extension is not recognised, or the file cannot
/// be written.
pub fn save<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SaveError> {
    let format = Format::from_path(path)?;
    let mut writer = BufWriter::new(fs::File::create(path)?);
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
        }
        Format::Yaml => serde_yaml::to_writer(&mut writer, value)?,
    }
    writer.flush()?;
    tracing::debug!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use test_case::test_case;

    use super::*;
    use crate::domain::{BuildMetadataList, CoverageRule, DutCriterion};

    #[test_case("rules.json" => Some(Format::Json))]
    #[test_case("rules.JSON" => Some(Format::Json))]
    #[test_case("plan.yaml" => Some(Format::Yaml))]
    #[test_case("plan.yml" => Some(Format::Yaml))]
    #[test_case("plan.textpb" => None)]
    #[test_case("plan" => None)]
    fn format_from_extension(path: &str) -> Option<Format> {
        Format::from_path(&PathBuf::from(path)).ok()
    }

    fn rule() -> CoverageRule {
        CoverageRule {
            name: "kernel:5.4".to_string(),
            dut_criteria: vec![DutCriterion::new("attr-program", ["ProgA"])],
            test_suites: Vec::new(),
        }
    }

    #[test_case("rules.json")]
    #[test_case("rules.yaml")]
    fn save_then_load(name: &str) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(name);

        save(&path, &vec![rule()]).unwrap();
        let loaded: Vec<CoverageRule> = load(&path).unwrap();

        assert_eq!(loaded, vec![rule()]);
    }

    #[test]
    fn load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let error = load::<BuildMetadataList>(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(error, LoadError::NotFound));
    }

    #[test]
    fn load_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("build.json");
        fs::write(&path, "{ not json").unwrap();

        let error = load::<BuildMetadataList>(&path).unwrap_err();
        assert!(matches!(error, LoadError::Json(_)));
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let error = save(&tmp.path().join("rules.txt"), &vec![rule()]).unwrap_err();
        assert!(matches!(error, SaveError::UnsupportedExtension(_)));
    }

    #[test]
    fn parses_build_metadata_yaml() {
        let list: BuildMetadataList = parse(
            "values:\n  - build_target:\n      overlay_name: overlayA\n    package_summary:\n      kernel_version: \"4.14\"\n",
            Format::Yaml,
        )
        .unwrap();
        assert_eq!(list.values.len(), 1);
        assert_eq!(list.values[0].kernel_version(), Some("4.14"));
    }
}
