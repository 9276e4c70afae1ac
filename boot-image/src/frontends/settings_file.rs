use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap as Map,
    fs,
    path::{Path, PathBuf},
};

use crate::services::SettingsFrontend;

const SETTINGS_FILE_NAMES: [&str; 2] = ["boot-image.yml", "boot-image.yaml"];

/// The project wide settings file. Everything is optional, anything left out
/// falls back to the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsFile {
    pub name: Option<String>,

    pub version: Option<String>,

    pub description: Option<String>,

    pub artifact: Option<PathBuf>,

    pub build_directory: Option<PathBuf>,

    #[serde(default)]
    pub image: ImageSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    pub base_image: Option<String>,

    pub expose_port: Option<u16>,

    pub fully_qualified_image_name: Option<String>,

    pub image_repo: Option<String>,

    pub image_name: Option<String>,

    pub tags: Option<Vec<String>>,

    pub use_buildx: Option<bool>,

    pub pull_for_build: Option<bool>,

    pub cache_from: Option<String>,

    pub cache_to: Option<String>,

    pub push: Option<bool>,

    pub platforms: Option<Vec<String>>,

    /// Use the jar's layer index instead of copying the jar as-is.
    pub layered: Option<bool>,

    pub launcher_class: Option<String>,

    #[serde(default)]
    pub labels: LabelSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSettings {
    pub description: Option<String>,

    pub title: Option<String>,

    pub version: Option<String>,

    pub revision: Option<String>,

    pub source_url: Option<String>,

    pub extra: Option<Map<String, String>>,
}

pub fn find_settings_file<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    for path in path.as_ref().ancestors() {
        for file_name in SETTINGS_FILE_NAMES.iter() {
            let settings_file_path = path.join(file_name);
            if settings_file_path.exists() {
                return Some(settings_file_path);
            }
        }
    }

    None
}

pub struct YamlSettingsFrontend;

impl YamlSettingsFrontend {
    pub fn new() -> YamlSettingsFrontend {
        YamlSettingsFrontend
    }
}

impl SettingsFrontend for YamlSettingsFrontend {
    fn settings<P: AsRef<Path>>(&mut self, settings_file_path: P) -> Result<SettingsFile> {
        let settings_file_path = settings_file_path.as_ref();
        let settings_file = fs::read_to_string(settings_file_path)
            .with_context(|| format!("couldn't read {}", settings_file_path.display()))?;

        if settings_file.trim().is_empty() {
            return Ok(SettingsFile::default());
        }

        let settings: Option<SettingsFile> = serde_yaml::from_str(&settings_file)
            .with_context(|| format!("couldn't parse {}", settings_file_path.display()))?;

        Ok(settings.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_settings_in_ancestor() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("src/main");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("boot-image.yaml"), "name: demo\n").unwrap();

        assert_eq!(
            find_settings_file(&nested),
            Some(root.path().join("boot-image.yaml"))
        );
    }

    #[test]
    fn prefers_yml_extension() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("boot-image.yml"), "").unwrap();
        fs::write(root.path().join("boot-image.yaml"), "").unwrap();

        assert_eq!(
            find_settings_file(root.path()),
            Some(root.path().join("boot-image.yml"))
        );
    }

    #[test]
    fn reads_camel_case_settings() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("boot-image.yml");
        fs::write(
            &path,
            r#"
name: demo
version: "1.2.3"
artifact: build/libs/demo.jar
image:
  baseImage: eclipse-temurin:21
  exposePort: 9090
  imageRepo: acme
  tags: [latest, stable]
  useBuildx: false
  platforms: [linux/amd64]
  layered: false
  labels:
    sourceUrl: https://example.com/demo
    extra:
      team: platform
"#,
        )
        .unwrap();

        let settings = YamlSettingsFrontend::new().settings(&path).unwrap();

        assert_eq!(settings.name.as_deref(), Some("demo"));
        assert_eq!(settings.version.as_deref(), Some("1.2.3"));
        assert_eq!(settings.artifact, Some(PathBuf::from("build/libs/demo.jar")));
        assert_eq!(settings.image.base_image.as_deref(), Some("eclipse-temurin:21"));
        assert_eq!(settings.image.expose_port, Some(9090));
        assert_eq!(
            settings.image.tags,
            Some(vec!["latest".to_owned(), "stable".to_owned()])
        );
        assert_eq!(settings.image.use_buildx, Some(false));
        assert_eq!(settings.image.layered, Some(false));
        assert_eq!(
            settings.image.labels.source_url.as_deref(),
            Some("https://example.com/demo")
        );
        assert_eq!(
            settings
                .image
                .labels
                .extra
                .as_ref()
                .and_then(|extra| extra.get("team"))
                .map(String::as_str),
            Some("platform")
        );
    }

    #[test]
    fn empty_file_is_default() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("boot-image.yml");
        fs::write(&path, "").unwrap();

        let settings = YamlSettingsFrontend::new().settings(&path).unwrap();

        assert_eq!(settings, SettingsFile::default());
    }
}
