use crate::{error::ConfigError, models::BuildConfiguration};

/// The image references to tag the build with. An externally supplied fully
/// qualified name replaces the repo/name/tag composition entirely.
pub fn image_names(configuration: &BuildConfiguration) -> Result<Vec<String>, ConfigError> {
    if let Some(name) = &configuration.fully_qualified_image_name {
        return Ok(vec![name.clone()]);
    }

    let repo_prefix = configuration
        .image_repo
        .as_ref()
        .map(|repo| format!("{}/", repo))
        .unwrap_or_default();

    let names = configuration
        .tags
        .iter()
        .map(|tag| format!("{}{}:{}", repo_prefix, configuration.image_name, tag))
        .collect::<Vec<_>>();

    if names.is_empty() {
        return Err(ConfigError::NoImageNames);
    }

    Ok(names)
}
