use anyhow::Result;
use log::info;
use std::{fs, path::PathBuf};

use crate::{
    command::{build_args, push_args},
    dockerfile::dockerfile,
    models::{BuildConfiguration, BuildMode, WorkLayout},
    naming::image_names,
    services::{ArtifactPackager, ImageBackend},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    ExtractLayers {
        artifact: PathBuf,
        layers_directory: PathBuf,
    },
    StageArtifact {
        artifact: PathBuf,
        staged_jar: PathBuf,
    },
    GenerateDockerfile {
        path: PathBuf,
        contents: String,
    },
    BuildImage {
        args: Vec<String>,
        context: PathBuf,
    },
    PushImage {
        image_name: String,
        args: Vec<String>,
    },
}

impl Step {
    pub fn describe(&self) -> String {
        match self {
            Step::ExtractLayers { artifact, .. } => {
                format!("Extracting layers from {}", artifact.display())
            }
            Step::StageArtifact { artifact, .. } => format!("Staging {}", artifact.display()),
            Step::GenerateDockerfile { path, .. } => format!("Generating {}", path.display()),
            Step::BuildImage { .. } => "Building image".to_owned(),
            Step::PushImage { image_name, .. } => format!("Pushing {}", image_name),
        }
    }
}

/// The ordered steps of one image build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub mode: BuildMode,
    pub image_names: Vec<String>,
    pub steps: Vec<Step>,
}

impl Plan {
    /// Decides everything up front: only the artifact preparation for the
    /// selected mode is part of the plan, and pushing is a separate step only
    /// when the build itself can't push. Configuration errors surface here,
    /// before anything runs.
    pub fn new(configuration: &BuildConfiguration, layout: &WorkLayout, quiet: bool) -> Result<Plan> {
        let mode = configuration.mode();
        let image_names = image_names(configuration)?;
        let mut steps = Vec::new();

        match mode {
            BuildMode::Layered => steps.push(Step::ExtractLayers {
                artifact: layout.artifact.clone(),
                layers_directory: layout.layers_directory(),
            }),
            BuildMode::FatJar => steps.push(Step::StageArtifact {
                artifact: layout.artifact.clone(),
                staged_jar: layout.staged_jar(),
            }),
        }

        steps.push(Step::GenerateDockerfile {
            path: layout.dockerfile(),
            contents: dockerfile(configuration),
        });

        steps.push(Step::BuildImage {
            args: build_args(
                configuration,
                &layout.dockerfile(),
                &layout.context(),
                &image_names,
                quiet,
            ),
            context: layout.context(),
        });

        if configuration.push && configuration.builder().pushes_separately() {
            for image_name in image_names.iter() {
                steps.push(Step::PushImage {
                    image_name: image_name.clone(),
                    args: push_args(image_name),
                });
            }
        }

        info!(
            "planned {:?} build of {:?} with {} steps",
            mode,
            image_names,
            steps.len()
        );

        Ok(Plan {
            mode,
            image_names,
            steps,
        })
    }
}

pub struct Controller {
    packager: Box<dyn ArtifactPackager>,
    backend: Box<dyn ImageBackend>,
}

impl Controller {
    pub fn init<P, B>(packager: P, backend: B) -> Controller
    where
        P: 'static + ArtifactPackager,
        B: 'static + ImageBackend,
    {
        Controller {
            packager: Box::new(packager),
            backend: Box::new(backend),
        }
    }

    pub fn step_apply(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::ExtractLayers {
                artifact,
                layers_directory,
            } => self.packager.explode(artifact, layers_directory)?,
            Step::StageArtifact {
                artifact,
                staged_jar,
            } => self.packager.stage(artifact, staged_jar)?,
            Step::GenerateDockerfile { path, contents } => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, contents)?;
            }
            Step::BuildImage { args, context } => self.backend.build_image(args, context)?,
            Step::PushImage { args, .. } => self.backend.push_image(args)?,
        }

        Ok(())
    }
}
