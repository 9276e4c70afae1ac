use anyhow::{Context, Result};
use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use super::run_command;
use crate::services::ArtifactPackager;

/// Uses Spring Boot's jar tools to split a boot jar into its layers.
pub struct SpringBootPackager {
    java: PathBuf,
}

impl SpringBootPackager {
    pub fn new() -> SpringBootPackager {
        let java = match env::var_os("JAVA_HOME") {
            Some(java_home) if !java_home.is_empty() => Path::new(&java_home).join("bin").join("java"),
            _ => PathBuf::from("java"),
        };

        SpringBootPackager { java }
    }
}

impl ArtifactPackager for SpringBootPackager {
    fn explode(&mut self, artifact: &Path, layers_directory: &Path) -> Result<()> {
        // The working directory changes below, so hand java an absolute path.
        let artifact = artifact
            .canonicalize()
            .with_context(|| format!("couldn't find {}", artifact.display()))?;

        if layers_directory.exists() {
            fs::remove_dir_all(layers_directory)?;
        }
        fs::create_dir_all(layers_directory)?;

        let mut command = Command::new(&self.java);
        command
            .arg("-Djarmode=tools")
            .arg("-jar")
            .arg(&artifact)
            .args(&["extract", "--layers", "--launcher", "--destination", "."])
            .current_dir(layers_directory);

        run_command(command)
    }

    fn stage(&mut self, artifact: &Path, staged_jar: &Path) -> Result<()> {
        if let Some(parent) = staged_jar.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(artifact, staged_jar).with_context(|| {
            format!(
                "couldn't copy {} to {}",
                artifact.display(),
                staged_jar.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stage_overwrites_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("app.jar");
        let staged_jar = temp_dir.path().join("build/boot-image/application.jar");
        fs::write(&artifact, "new").unwrap();
        fs::create_dir_all(staged_jar.parent().unwrap()).unwrap();
        fs::write(&staged_jar, "stale contents").unwrap();

        SpringBootPackager::new().stage(&artifact, &staged_jar).unwrap();

        assert_eq!(fs::read_to_string(&staged_jar).unwrap(), "new");
    }

    #[test]
    fn explode_requires_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let layers_directory = temp_dir.path().join("layers");

        let result = SpringBootPackager::new().explode(&temp_dir.path().join("missing.jar"), &layers_directory);

        assert!(result.is_err());
        assert!(!layers_directory.exists());
    }
}
