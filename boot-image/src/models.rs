use std::{collections::BTreeMap as Map, path::PathBuf};

pub const DEFAULT_BASE_IMAGE: &str = "eclipse-temurin:17";
pub const DEFAULT_EXPOSE_PORT: u16 = 8080;
pub const DEFAULT_LAUNCHER_CLASS: &str = "org.springframework.boot.loader.launch.JarLauncher";
pub const DEFAULT_TAG: &str = "latest";
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// OCI image metadata attached to the built image with `--label`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct ImageLabelSet {
    pub description: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub revision: Option<String>,
    pub source_url: Option<String>,
    pub extra: Map<String, String>,
}

/// The fully resolved options for one image build. Built once by the
/// resolver and only ever handed out by reference afterwards.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub base_image: String,
    pub expose_port: u16,
    pub fully_qualified_image_name: Option<String>,
    pub image_repo: Option<String>,
    pub image_name: String,
    pub tags: Vec<String>,
    pub use_buildx: bool,
    pub pull_for_build: bool,
    pub push: bool,
    pub cache_from: Option<String>,
    pub cache_to: Option<String>,
    pub platforms: Vec<String>,
    pub layered: bool,
    pub launcher_class: String,
    pub labels: ImageLabelSet,
}

impl BuildConfiguration {
    /// The defaults for a project with the given name and version.
    pub fn with_defaults(project_name: &str, project_version: &str) -> BuildConfiguration {
        BuildConfiguration {
            base_image: DEFAULT_BASE_IMAGE.into(),
            expose_port: DEFAULT_EXPOSE_PORT,
            fully_qualified_image_name: None,
            image_repo: None,
            image_name: project_name.into(),
            tags: vec![DEFAULT_TAG.into(), project_version.into()],
            use_buildx: true,
            pull_for_build: false,
            push: false,
            cache_from: None,
            cache_to: None,
            platforms: Vec::new(),
            layered: true,
            launcher_class: DEFAULT_LAUNCHER_CLASS.into(),
            labels: ImageLabelSet::default(),
        }
    }

    pub fn builder(&self) -> Builder {
        Builder::select(self)
    }

    pub fn mode(&self) -> BuildMode {
        BuildMode::select(self)
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum BuildMode {
    Layered,
    FatJar,
}

impl BuildMode {
    pub fn select(configuration: &BuildConfiguration) -> BuildMode {
        if configuration.layered {
            BuildMode::Layered
        } else {
            BuildMode::FatJar
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Builder {
    Buildx,
    Legacy,
}

impl Builder {
    /// A cache export only works with buildx, so asking for one selects buildx
    /// even when `use_buildx` is off.
    pub fn select(configuration: &BuildConfiguration) -> Builder {
        if configuration.use_buildx || configuration.cache_to.is_some() {
            Builder::Buildx
        } else {
            Builder::Legacy
        }
    }

    /// Legacy builds push in a separate step, buildx pushes as part of the build.
    pub fn pushes_separately(self) -> bool {
        self == Builder::Legacy
    }
}

/// Project metadata that the configuration defaults are derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

/// Where the build writes its intermediate files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkLayout {
    pub artifact: PathBuf,
    pub image_directory: PathBuf,
}

impl WorkLayout {
    pub fn new<A: Into<PathBuf>, B: Into<PathBuf>>(artifact: A, build_directory: B) -> WorkLayout {
        WorkLayout {
            artifact: artifact.into(),
            image_directory: build_directory.into().join("boot-image"),
        }
    }

    pub fn layers_directory(&self) -> PathBuf {
        self.image_directory.join("layers")
    }

    pub fn staged_jar(&self) -> PathBuf {
        self.image_directory.join("application.jar")
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.image_directory.join("Dockerfile")
    }

    /// The context root holds both `layers/` and `application.jar`, so the
    /// descriptor paths are the same relative paths in either mode.
    pub fn context(&self) -> PathBuf {
        self.image_directory.clone()
    }
}
