use anyhow::Result;
use std::path::Path;

use crate::frontends::SettingsFile;

/// A read-only string lookup, such as invocation properties or the process
/// environment.
pub trait PropertySource {
    fn property(&self, name: &str) -> Option<String>;
}

pub trait SettingsFrontend {
    fn settings<P: AsRef<Path>>(&mut self, settings_file_path: P) -> Result<SettingsFile>;
}

/// Prepares the application artifact for the image build context. Both
/// operations replace whatever a previous run left behind.
pub trait ArtifactPackager {
    fn explode(&mut self, artifact: &Path, layers_directory: &Path) -> Result<()>;

    fn stage(&mut self, artifact: &Path, staged_jar: &Path) -> Result<()>;
}

pub trait ImageBackend {
    fn build_image(&mut self, args: &[String], context: &Path) -> Result<()>;

    fn push_image(&mut self, args: &[String]) -> Result<()>;
}
