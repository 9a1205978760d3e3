//! Deploy command: hand the bundle archive to the build tool.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::DeployConfig;
use crate::deploy::BuildToolDeployer;
use crate::error::Result;
use crate::paths::Workspace;

/// Default deployment environment when none is configured.
const DEFAULT_ENV: &str = "dev-00";

/// Options for the deploy command.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Access token handed to the build tool for management API auth.
    pub token: String,
    pub proxy_name: Option<String>,
    pub env_name: Option<String>,
    /// Build tool program; defaults to `mvn`.
    pub tool: Option<PathBuf>,
}

impl DeployOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            proxy_name: None,
            env_name: None,
            tool: None,
        }
    }

    pub fn with_proxy_name(mut self, name: impl Into<String>) -> Self {
        self.proxy_name = Some(name.into());
        self
    }

    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

/// Report produced by a successful deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub proxy_name: String,
    pub env_name: String,
    pub project_id: String,
    pub archive_path: PathBuf,
}

/// Rediscovers the archive by convention and runs the build tool on it.
#[derive(Debug)]
pub struct DeployCommand {
    workspace: Workspace,
    config: DeployConfig,
}

impl DeployCommand {
    /// Create a command, loading the configuration from the workspace.
    pub fn new(workspace: Workspace) -> Result<Self> {
        let config = DeployConfig::load(&workspace.config_file())?;
        Ok(Self { workspace, config })
    }

    pub fn execute(&self, options: &DeployOptions) -> Result<DeployReport> {
        let proxy_name = match options.proxy_name.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.proxy_name()?.to_string(),
        };
        let env_name = options
            .env_name
            .clone()
            .unwrap_or_else(|| DEFAULT_ENV.to_string());
        let project_id = self.config.gcp_project_id()?.to_string();
        let archive_path = self.workspace.archive_path(&proxy_name);

        let program = options
            .tool
            .clone()
            .unwrap_or_else(|| PathBuf::from(BuildToolDeployer::DEFAULT_PROGRAM));
        let deployer = BuildToolDeployer::new(program, self.workspace.pom_file());
        deployer.deploy(&archive_path, &env_name, &project_id, &options.token)?;

        Ok(DeployReport {
            proxy_name,
            env_name,
            project_id,
            archive_path,
        })
    }
}
