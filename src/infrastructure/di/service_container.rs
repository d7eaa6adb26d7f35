//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::DockerService;
use crate::config::Settings;
use crate::infrastructure::traits::{
    Clock, CommandRunner, FileSystem, RealClock, RealCommandRunner, RealFileSystem,
};

/// Container holding shared dependencies and the long-lived services.
///
/// Bootstrap services are constructed per-run in the command layer, since
/// they depend on runtime flags (binary paths, wallet dir, log path).
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Wall-clock abstraction
    pub clock: Arc<dyn Clock>,

    /// Container engine wrapper
    pub docker: DockerService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(RealClock),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let settings = Arc::new(settings);
        let docker = DockerService::new(fs.clone(), cmd.clone(), settings.clone());

        Self {
            settings,
            fs,
            cmd,
            clock,
            docker,
        }
    }
}
