use std::path::Path;

use crate::models::{BuildConfiguration, Builder};

/// Assembles the `docker` arguments for building the image.
///
/// `quiet` asks the backend for terse output, callers pass it when info
/// logging is off.
pub fn build_args(
    configuration: &BuildConfiguration,
    dockerfile: &Path,
    context: &Path,
    image_names: &[String],
    quiet: bool,
) -> Vec<String> {
    let mut args = Vec::new();
    let builder = configuration.builder();

    if builder == Builder::Buildx {
        args.push("buildx".to_owned());
    }
    args.push("build".to_owned());

    if quiet {
        args.push("--quiet".to_owned());
    }

    add_build_arg(&mut args, "BASE_IMG", &configuration.base_image);
    add_build_arg(&mut args, "EXPOSE_PORT", &configuration.expose_port);

    for image_name in image_names {
        args.push("--tag".to_owned());
        args.push(image_name.clone());
    }

    args.push("--file".to_owned());
    args.push(dockerfile.display().to_string());

    add_optional_arg(&mut args, "--cache-from", &configuration.cache_from);
    add_optional_arg(&mut args, "--cache-to", &configuration.cache_to);

    if configuration.pull_for_build {
        args.push("--pull".to_owned());
    }

    if builder == Builder::Buildx {
        if configuration.push {
            args.push("--push".to_owned());
        } else {
            args.push("--load".to_owned());
        }

        if !configuration.platforms.is_empty() {
            args.push("--platform".to_owned());
            args.push(configuration.platforms.join(","));
        }
    }

    for label in configuration.labels.label_pairs() {
        args.push("--label".to_owned());
        args.push(label);
    }

    args.push(context.display().to_string());

    args
}

/// Assembles the `docker` arguments for pushing one image. Only needed with
/// the legacy builder, buildx pushes as part of the build.
pub fn push_args(image_name: &str) -> Vec<String> {
    vec!["push".to_owned(), image_name.to_owned()]
}

fn add_build_arg<V: std::fmt::Display>(args: &mut Vec<String>, name: &str, value: V) {
    args.push("--build-arg".to_owned());
    args.push(format!("{}={}", name, value));
}

fn add_optional_arg(args: &mut Vec<String>, arg: &str, value: &Option<String>) {
    if let Some(value) = value {
        args.push(arg.to_owned());
        args.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn configuration() -> BuildConfiguration {
        let mut configuration = BuildConfiguration::with_defaults("app", "1.2.3");
        configuration.image_repo = Some("acme".into());
        configuration
    }

    fn names() -> Vec<String> {
        vec!["acme/app:latest".to_owned(), "acme/app:1.2.3".to_owned()]
    }

    fn args(configuration: &BuildConfiguration, quiet: bool) -> Vec<String> {
        build_args(
            configuration,
            Path::new("build/boot-image/Dockerfile"),
            Path::new("build/boot-image"),
            &names(),
            quiet,
        )
    }

    fn position(args: &[String], arg: &str) -> usize {
        args.iter()
            .position(|a| a == arg)
            .unwrap_or_else(|| panic!("{} missing from {:?}", arg, args))
    }

    #[test]
    fn buildx_defaults() {
        assert_eq!(
            args(&configuration(), false),
            vec![
                "buildx",
                "build",
                "--build-arg",
                "BASE_IMG=eclipse-temurin:17",
                "--build-arg",
                "EXPOSE_PORT=8080",
                "--tag",
                "acme/app:latest",
                "--tag",
                "acme/app:1.2.3",
                "--file",
                "build/boot-image/Dockerfile",
                "--load",
                "build/boot-image",
            ]
        );
    }

    #[test]
    fn legacy_builder() {
        let mut configuration = configuration();
        configuration.use_buildx = false;
        configuration.push = true;
        configuration.platforms = vec!["linux/amd64".into()];
        configuration.pull_for_build = true;

        assert_eq!(
            args(&configuration, true),
            vec![
                "build",
                "--quiet",
                "--build-arg",
                "BASE_IMG=eclipse-temurin:17",
                "--build-arg",
                "EXPOSE_PORT=8080",
                "--tag",
                "acme/app:latest",
                "--tag",
                "acme/app:1.2.3",
                "--file",
                "build/boot-image/Dockerfile",
                "--pull",
                "build/boot-image",
            ]
        );
    }

    #[test]
    fn cache_export_selects_buildx() {
        let mut configuration = configuration();
        configuration.use_buildx = false;
        configuration.cache_to = Some("type=gha".into());

        let args = args(&configuration, false);

        assert_eq!(args[0], "buildx");
        assert_eq!(args[position(&args, "--cache-to") + 1], "type=gha");
        assert!(args.contains(&"--load".to_owned()));
    }

    #[test]
    fn build_args_come_before_tags() {
        let args = args(&configuration(), false);

        let base_image = position(&args, "BASE_IMG=eclipse-temurin:17");
        let expose_port = position(&args, "EXPOSE_PORT=8080");
        let tag = position(&args, "--tag");

        assert_eq!(args[base_image - 1], "--build-arg");
        assert_eq!(args[expose_port - 1], "--build-arg");
        assert!(base_image < expose_port);
        assert!(expose_port < tag);
    }

    #[test]
    fn buildx_options() {
        let mut configuration = configuration();
        configuration.cache_from = Some("type=registry,ref=acme/cache".into());
        configuration.cache_to = Some("type=registry,ref=acme/cache,mode=max".into());
        configuration.push = true;
        configuration.platforms = vec!["linux/amd64".into(), "linux/arm64".into()];

        let args = args(&configuration, false);
        let tail = &args[position(&args, "--file") + 2..];

        assert_eq!(
            tail,
            &[
                "--cache-from",
                "type=registry,ref=acme/cache",
                "--cache-to",
                "type=registry,ref=acme/cache,mode=max",
                "--push",
                "--platform",
                "linux/amd64,linux/arm64",
                "build/boot-image",
            ][..]
        );
    }

    #[test]
    fn labels_before_context() {
        let mut configuration = configuration();
        configuration.labels.title = Some("app".into());
        configuration.labels.description = Some("".into());
        configuration.labels.revision = Some("abc123".into());
        configuration.labels.extra = {
            let mut extra = Map::new();
            extra.insert("team".to_owned(), "platform".to_owned());
            extra
        };

        let args = args(&configuration, false);
        let labels = &args[position(&args, "--load") + 1..];

        assert_eq!(
            labels,
            &[
                "--label",
                "org.opencontainers.image.title=app",
                "--label",
                "org.opencontainers.image.revision=abc123",
                "--label",
                "team=platform",
                "build/boot-image",
            ][..]
        );
    }

    #[test]
    fn fully_qualified_name_is_single_tag() {
        let args = build_args(
            &configuration(),
            Path::new("Dockerfile"),
            Path::new("."),
            &["registry.local/app:abc".to_owned()],
            false,
        );

        assert_eq!(args.iter().filter(|arg| *arg == "--tag").count(), 1);
        assert_eq!(args[position(&args, "--tag") + 1], "registry.local/app:abc");
    }

    #[test]
    fn push_invocation() {
        assert_eq!(push_args("acme/app:latest"), vec!["push", "acme/app:latest"]);
    }
}
