//! Container engine wrapper
//!
//! Builds the image family for a deployment tag and drives the
//! per-environment containers. All engine work goes through the `docker`
//! binary; this service only assembles argument vectors and reads results
//! back.

use std::process::Output;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{Credentials, Settings};
use crate::domain::{sanitize_tag, Component, Environment};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

const DOCKER: &str = "docker";

/// One image build in the family built for a deployment tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuild {
    /// Dockerfile name under the configured dockerfiles dir
    pub dockerfile: String,
    /// Fully qualified image reference
    pub image: String,
    pub build_args: Vec<(String, String)>,
    /// Rebuild even when the image already exists
    pub force: bool,
}

/// Result of a single image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Image already existed and force was not set
    Skipped,
    /// Image was built, with elapsed wall time
    Built(Duration),
}

/// Container engine wrapper for image builds and container lifecycle.
pub struct DockerService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl DockerService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Sanitize a git tag into an image tag, warning when it changes.
    pub fn tag_name(&self, tag: &str) -> String {
        let sanitized = sanitize_tag(tag);
        if sanitized != tag {
            warn!(
                "tag has unacceptable characters, changed {} ===> {}",
                tag, sanitized
            );
        }
        sanitized
    }

    /// Fully qualified image reference, e.g. `asteroid_rush/node:v1.0`.
    pub fn image_name(&self, name: &str, tag: Option<&str>) -> String {
        match tag {
            Some(tag) => format!("{}{}:{}", self.settings.image_prefix, name, self.tag_name(tag)),
            None => format!("{}{}", self.settings.image_prefix, name),
        }
    }

    fn docker(&self, args: &[&str]) -> ApplicationResult<Output> {
        debug!("docker {}", args.join(" "));
        self.cmd
            .run(DOCKER, args)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run docker {}", args.join(" ")),
                source: Box::new(e),
            })
    }

    fn docker_checked(&self, args: &[&str]) -> ApplicationResult<Output> {
        let output = self.docker(args)?;
        if output.status.success() {
            return Ok(output);
        }
        Err(ApplicationError::CommandFailed {
            command: format!("docker {}", args.join(" ")),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Whether an image reference is present in the local store.
    pub fn image_exists(&self, image: &str) -> ApplicationResult<bool> {
        let output = self.docker(&["image", "inspect", image])?;
        Ok(output.status.success())
    }

    /// The image family built for a deployment tag, in build order.
    ///
    /// The builder image carries the toolchain and is never force-rebuilt;
    /// the base image checks out the tagged branch; boot/node/keos derive
    /// from it by version.
    pub fn build_plan(
        &self,
        environment: Environment,
        tag: &str,
        credentials: &Credentials,
        force: bool,
    ) -> Vec<ImageBuild> {
        let version = self.tag_name(tag);
        let mut plan = vec![
            ImageBuild {
                dockerfile: "Dockerfile.Builder".to_string(),
                image: self.image_name("builder", None),
                build_args: Vec::new(),
                force: false,
            },
            ImageBuild {
                dockerfile: "Dockerfile.Base".to_string(),
                image: self.image_name("base", Some(tag)),
                build_args: vec![
                    ("branch".to_string(), tag.to_string()),
                    ("login".to_string(), credentials.login.clone()),
                    ("password".to_string(), credentials.password.clone()),
                    ("environment".to_string(), environment.to_string()),
                ],
                force,
            },
        ];
        for name in ["boot", "node", "keos"] {
            plan.push(ImageBuild {
                dockerfile: format!("Dockerfile.{}", capitalize(name)),
                image: self.image_name(name, Some(tag)),
                build_args: vec![("version".to_string(), version.clone())],
                force,
            });
        }
        plan
    }

    /// Build one image, skipping when it already exists and force is unset.
    pub fn build(&self, build: &ImageBuild) -> ApplicationResult<BuildOutcome> {
        if !build.force && self.image_exists(&build.image)? {
            return Ok(BuildOutcome::Skipped);
        }

        let dockerfile = self.settings.dockerfiles_dir.join(&build.dockerfile);
        let dockerfile = dockerfile.to_string_lossy();
        let build_args: Vec<String> = build
            .build_args
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();

        let mut args = vec!["build", "-f", dockerfile.as_ref(), "-t", build.image.as_str()];
        for arg in &build_args {
            args.push("--build-arg");
            args.push(arg);
        }
        args.push(".");

        let started = Instant::now();
        self.docker_checked(&args)?;
        Ok(BuildOutcome::Built(started.elapsed()))
    }

    /// Record the deployed tag and start a component's container.
    ///
    /// Any stale container under the deterministic name is removed first.
    /// Returns the container name.
    pub fn start(
        &self,
        environment: Environment,
        component: Component,
        tag: &str,
    ) -> ApplicationResult<String> {
        let env_dir = self.settings.deploy_dir.join(environment.as_str());
        self.fs
            .create_dir_all(&env_dir)
            .with_path_context("create environment dir", &env_dir)?;
        let env_file = env_dir.join(".env");
        let content = format!("VERSION={}\n", self.tag_name(tag));
        self.fs
            .write(&env_file, &content)
            .with_path_context("write version file", &env_file)?;

        let container = component.container_name(environment);
        // Stale containers under the same name block `docker run`.
        let _ = self.docker(&["rm", "-f", &container]);

        let image = self.image_name(component.image(), Some(tag));
        let mut args = vec!["run", "-d", "--name", container.as_str(), image.as_str()];
        if component.fresh_state() {
            args.push("--delete-all-blocks");
        }
        self.docker_checked(&args)?;
        Ok(container)
    }

    /// Stop and remove a component's container.
    ///
    /// Returns `false` when no such container exists.
    pub fn stop(&self, environment: Environment, component: Component) -> ApplicationResult<bool> {
        let container = component.container_name(environment);
        let output = self.docker(&["stop", &container])?;
        if !output.status.success() {
            return Ok(false);
        }
        let _ = self.docker(&["rm", &container]);
        Ok(true)
    }

    /// Container status per component, `not found` for missing containers.
    pub fn status(&self, environment: Environment) -> Vec<(Component, String)> {
        Component::ALL
            .iter()
            .map(|component| {
                let container = component.container_name(environment);
                let status = self
                    .docker(&["inspect", "-f", "{{.State.Status}}", &container])
                    .ok()
                    .filter(|output| output.status.success())
                    .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                    .unwrap_or_else(|| "not found".to_string());
                (*component, status)
            })
            .collect()
    }

    /// Deployed version for an environment, read from `<env>/.env`.
    pub fn version(&self, environment: Environment) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"VERSION=(\w+)").unwrap());

        let env_file = self
            .settings
            .deploy_dir
            .join(environment.as_str())
            .join(".env");
        let content = self.fs.read_to_string(&env_file).ok()?;
        re.captures(&content).map(|caps| caps[1].to_string())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
