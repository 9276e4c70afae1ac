use anyhow::{anyhow, Result};
use crossterm::{
    cursor,
    style::{self, Colorize, Styler},
    QueueableCommand,
};
use log::{info, LevelFilter};
use std::{
    env,
    io::{stdout, Write},
    path::{Path, PathBuf},
};
use structopt::StructOpt;

use backends::{DockerBackend, SpringBootPackager};
use controller::{Controller, Plan, Step};
use dockerfile::dockerfile;
use frontends::{find_settings_file, parse_property, Environment, Properties, SettingsFile, YamlSettingsFrontend};
use models::{ProjectInfo, WorkLayout, UNSPECIFIED_VERSION};
use resolver::ConfigurationResolver;
use services::SettingsFrontend;

mod backends;
mod command;
mod controller;
mod dockerfile;
mod error;
mod frontends;
mod labels;
mod models;
mod naming;
mod resolver;
mod services;

#[derive(Debug, StructOpt)]
struct Invocation {
    #[structopt(short = "P", long = "property", parse(try_from_str = parse_property), number_of_values = 1)]
    /// Override a setting for this invocation, e.g. -P imageTags=latest,1.0
    properties: Vec<(String, String)>,

    #[structopt(long, parse(from_os_str))]
    /// Settings file to use instead of searching for boot-image.yml.
    settings: Option<PathBuf>,

    #[structopt(long, default_value = "docker")]
    /// The container build client to run.
    docker: String,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "boot-image",
    about = "Builds container images from Spring Boot application jars."
)]
enum Opt {
    /// Prepares the jar, generates a Dockerfile and builds the image.
    Build {
        #[structopt(flatten)]
        invocation: Invocation,
    },
    /// Builds the image and pushes it to its registry.
    Push {
        #[structopt(flatten)]
        invocation: Invocation,
    },
    /// Shows the steps and commands a build would run without running them.
    Plan {
        #[structopt(flatten)]
        invocation: Invocation,
    },
    /// Prints the Dockerfile a build would use.
    Dockerfile {
        #[structopt(flatten)]
        invocation: Invocation,
    },
}

struct Project {
    info: ProjectInfo,
    layout: WorkLayout,
    settings: SettingsFile,
}

fn load_project(current_dir: &Path, settings_path: Option<PathBuf>) -> Result<Project> {
    let current_dir = current_dir.to_path_buf();
    let settings_path = settings_path.or_else(|| find_settings_file(&current_dir));

    let (project_dir, settings) = match settings_path {
        Some(settings_path) => {
            info!("found settings file {:?}", settings_path);
            let settings = YamlSettingsFrontend::new().settings(&settings_path)?;
            let project_dir = settings_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| current_dir.clone());
            (project_dir, settings)
        }
        None => {
            info!("no settings file, using defaults");
            (current_dir.clone(), SettingsFile::default())
        }
    };

    let project_dir = if project_dir.as_os_str().is_empty() {
        current_dir
    } else {
        project_dir
    };

    let name = match &settings.name {
        Some(name) => name.clone(),
        None => project_dir
            .canonicalize()?
            .file_name()
            .and_then(|name| name.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("Couldn't determine the project name."))?,
    };
    let version = settings
        .version
        .clone()
        .unwrap_or_else(|| UNSPECIFIED_VERSION.into());
    info!("project {} version {}", name, version);

    let build_directory = project_dir.join(
        settings
            .build_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("build")),
    );
    let artifact = match &settings.artifact {
        Some(artifact) => project_dir.join(artifact),
        None => build_directory
            .join("libs")
            .join(format!("{}-{}.jar", name, version)),
    };

    Ok(Project {
        info: ProjectInfo {
            name,
            version,
            description: settings.description.clone(),
        },
        layout: WorkLayout::new(artifact, build_directory),
        settings,
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Goal {
    Build,
    Push,
    Plan,
    Dockerfile,
}

/// `push` is `build` with `imagePush=true`, unless the invocation sets it.
fn invocation_properties(goal: Goal, properties: &[(String, String)]) -> Properties {
    let mut properties: Properties = properties.iter().cloned().collect();
    if goal == Goal::Push && !properties.contains("imagePush") {
        properties.set("imagePush", "true");
    }

    properties
}

fn main() -> Result<()> {
    pretty_env_logger::init_custom_env("LOG");

    let opt = Opt::from_args();

    let (goal, invocation) = match opt {
        Opt::Build { invocation } => (Goal::Build, invocation),
        Opt::Push { invocation } => (Goal::Push, invocation),
        Opt::Plan { invocation } => (Goal::Plan, invocation),
        Opt::Dockerfile { invocation } => (Goal::Dockerfile, invocation),
    };

    let properties = invocation_properties(goal, &invocation.properties);
    let project = load_project(&env::current_dir()?, invocation.settings.clone())?;

    let configuration = ConfigurationResolver::new(
        &properties,
        &Environment,
        &project.settings.image,
        &project.info,
    )
    .resolve()?;
    info!("resolved configuration for {:?}", goal);

    if goal == Goal::Dockerfile {
        print!("{}", dockerfile(&configuration));
        return Ok(());
    }

    let quiet = log::max_level() < LevelFilter::Info;
    let plan = Plan::new(&configuration, &project.layout, quiet)?;

    let mut stdout = stdout();

    match goal {
        Goal::Plan => print_plan(&mut stdout, &plan, &invocation.docker)?,
        _ => {
            let mut controller = Controller::init(
                SpringBootPackager::new(),
                DockerBackend::new(&invocation.docker),
            );
            steps_apply(&mut controller, &mut stdout, &plan)?;
        }
    }

    Ok(())
}

fn print_plan(stdout: &mut impl Write, plan: &Plan, docker: &str) -> Result<()> {
    stdout
        .queue(style::PrintStyledContent("Mode: ".cyan().bold()))?
        .queue(style::Print(format!("{:?}\n", plan.mode)))?
        .queue(style::PrintStyledContent("Images: ".cyan().bold()))?
        .queue(style::Print(format!("{}\n", plan.image_names.join(", "))))?;

    for (index, step) in plan.steps.iter().enumerate() {
        stdout.queue(style::Print(format!("{}. {}\n", index + 1, step.describe())))?;

        match step {
            Step::BuildImage { args, .. } | Step::PushImage { args, .. } => {
                stdout.queue(style::Print(format!("   {} {}\n", docker, args.join(" "))))?;
            }
            _ => (),
        }
    }

    stdout.flush()?;

    Ok(())
}

fn steps_apply(controller: &mut Controller, stdout: &mut impl Write, plan: &Plan) -> Result<()> {
    let lines = plan
        .steps
        .iter()
        .map(|step| step.describe())
        .collect::<Vec<_>>();

    let longest_line = lines.iter().map(|line| line.len()).max().unwrap_or(0);

    for (line, step) in lines.iter().zip(plan.steps.iter()) {
        let padding = longest_line - line.len() + 1;
        stdout
            .queue(style::Print(line))?
            .queue(cursor::MoveRight(padding as u16))?
            .queue(style::Print("... "))?
            .flush()?;

        controller.step_apply(step)?;

        stdout
            .queue(style::PrintStyledContent("done".green().bold()))?
            .queue(style::Print("\n"))?
            .flush()?;
    }

    Ok(())
}
