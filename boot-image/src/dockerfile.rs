use crate::models::{BuildConfiguration, BuildMode};

pub const STAGED_JAR_NAME: &str = "application.jar";

/// Generates the Dockerfile for the configuration's build mode. The base image
/// and port are build arguments so the same file works for any values passed
/// at build time.
pub fn dockerfile(configuration: &BuildConfiguration) -> String {
    let mut lines = vec![
        format!("ARG BASE_IMG={}", configuration.base_image),
        "FROM ${BASE_IMG}".to_owned(),
        "ARG EXPOSE_PORT".to_owned(),
        "EXPOSE ${EXPOSE_PORT}".to_owned(),
        "WORKDIR /application".to_owned(),
    ];

    match configuration.mode() {
        BuildMode::Layered => {
            lines.push("COPY layers/dependencies/ ./".to_owned());
            lines.push("COPY layers/spring-boot-loader/ ./".to_owned());
            lines.push("COPY layers/snapshot-dependencies/ ./".to_owned());
            if !configuration.use_buildx {
                // https://github.com/moby/moby/issues/37965
                lines.push("RUN true".to_owned());
            }
            lines.push("COPY layers/application/ ./".to_owned());
            lines.push(format!(
                "ENTRYPOINT [\"java\", \"{}\"]",
                configuration.launcher_class
            ));
        }
        BuildMode::FatJar => {
            lines.push(format!("COPY {} ./", STAGED_JAR_NAME));
            lines.push(format!(
                "ENTRYPOINT [\"java\", \"-jar\", \"{}\"]",
                STAGED_JAR_NAME
            ));
        }
    }

    lines.into_iter().map(|line| line + "\n").collect()
}
