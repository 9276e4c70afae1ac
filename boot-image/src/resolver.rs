use log::{debug, warn};

use crate::{
    error::ConfigError,
    frontends::ImageSettings,
    labels::parse_extra_labels,
    models::{BuildConfiguration, ImageLabelSet, ProjectInfo},
    services::PropertySource,
};

const GITHUB_URL: &str = "https://github.com/";

/// Merges the option sources into one [`BuildConfiguration`]. For each field
/// the first source that has a value wins, in this order: invocation
/// properties, environment (only `IMAGE`, `PUSH_IMAGE` and
/// `GITHUB_REPOSITORY`), the settings file, the built-in default.
pub struct ConfigurationResolver<'a> {
    properties: &'a dyn PropertySource,
    environment: &'a dyn PropertySource,
    settings: &'a ImageSettings,
    project: &'a ProjectInfo,
}

impl<'a> ConfigurationResolver<'a> {
    pub fn new(
        properties: &'a dyn PropertySource,
        environment: &'a dyn PropertySource,
        settings: &'a ImageSettings,
        project: &'a ProjectInfo,
    ) -> ConfigurationResolver<'a> {
        ConfigurationResolver {
            properties,
            environment,
            settings,
            project,
        }
    }

    pub fn resolve(&self) -> Result<BuildConfiguration, ConfigError> {
        let defaults = BuildConfiguration::with_defaults(&self.project.name, &self.project.version);
        let settings = self.settings;

        let expose_port = match self.property("imageExposePort") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => settings.expose_port.unwrap_or(defaults.expose_port),
        };

        let push = self
            .property("imagePush")
            .or_else(|| self.environment.property("PUSH_IMAGE"))
            .map(|value| parse_boolean(&value))
            .or(settings.push)
            .unwrap_or(defaults.push);

        let configuration = BuildConfiguration {
            base_image: self
                .property("imageBase")
                .or_else(|| settings.base_image.clone())
                .unwrap_or(defaults.base_image),
            expose_port,
            fully_qualified_image_name: self
                .environment
                .property("IMAGE")
                .or_else(|| settings.fully_qualified_image_name.clone()),
            image_repo: self
                .property("imageRepo")
                .or_else(|| settings.image_repo.clone()),
            image_name: self
                .property("imageName")
                .or_else(|| settings.image_name.clone())
                .unwrap_or(defaults.image_name),
            tags: self
                .list_property("imageTags")
                .or_else(|| settings.tags.clone())
                .unwrap_or(defaults.tags),
            use_buildx: self
                .boolean_property("imageUseBuildx")
                .or(settings.use_buildx)
                .unwrap_or(defaults.use_buildx),
            pull_for_build: self
                .boolean_property("imagePull")
                .or(settings.pull_for_build)
                .unwrap_or(defaults.pull_for_build),
            push,
            cache_from: self
                .property("imageCacheFrom")
                .or_else(|| settings.cache_from.clone()),
            cache_to: self
                .property("imageCacheTo")
                .or_else(|| settings.cache_to.clone()),
            platforms: self
                .list_property("imagePlatforms")
                .or_else(|| settings.platforms.clone())
                .unwrap_or(defaults.platforms),
            layered: self
                .boolean_property("imageLayered")
                .or(settings.layered)
                .unwrap_or(defaults.layered),
            launcher_class: self
                .property("imageLauncherClass")
                .or_else(|| settings.launcher_class.clone())
                .unwrap_or(defaults.launcher_class),
            labels: self.resolve_labels(),
        };

        if !configuration.use_buildx {
            if let Some(cache_to) = &configuration.cache_to {
                return Err(ConfigError::CacheToWithoutBuildx {
                    cache_to: cache_to.clone(),
                });
            }

            if !configuration.platforms.is_empty() {
                warn!(
                    "platforms {:?} are ignored without buildx",
                    configuration.platforms
                );
            }
        }

        debug!("resolved build configuration {:?}", configuration);

        Ok(configuration)
    }

    fn resolve_labels(&self) -> ImageLabelSet {
        let settings = &self.settings.labels;
        let project = self.project;

        ImageLabelSet {
            description: settings
                .description
                .clone()
                .or_else(|| project.description.clone()),
            title: settings.title.clone().or_else(|| Some(project.name.clone())),
            version: self
                .property("imageVersion")
                .or_else(|| settings.version.clone())
                .or_else(|| Some(project.version.clone())),
            revision: self
                .property("imageRevision")
                .or_else(|| settings.revision.clone())
                .or_else(|| self.property("git.commit")),
            source_url: self
                .environment
                .property("GITHUB_REPOSITORY")
                .map(|repository| format!("{}{}", GITHUB_URL, repository))
                .or_else(|| settings.source_url.clone()),
            extra: self
                .list_property("imageExtraLabels")
                .map(parse_extra_labels)
                .or_else(|| settings.extra.clone())
                .unwrap_or_default(),
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.property(name)
    }

    fn boolean_property(&self, name: &str) -> Option<bool> {
        self.property(name).map(|value| parse_boolean(&value))
    }

    fn list_property(&self, name: &str) -> Option<Vec<String>> {
        self.property(name).map(|value| parse_list(&value))
    }
}

/// `true` in any letter case is true, everything else is false.
pub fn parse_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Splits on `,` as-is: no trimming, and empty segments are kept.
pub fn parse_list(value: &str) -> Vec<String> {
    value.split(',').map(String::from).collect()
}
