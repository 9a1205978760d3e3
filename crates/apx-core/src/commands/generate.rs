//! Generate command: assemble and archive one proxy bundle.

use std::path::PathBuf;

use serde::Serialize;

use crate::archive;
use crate::bundle::{BundleAssembler, BundleSpec};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::paths::Workspace;

/// Options for the generate command.
///
/// Every field falls back to the configuration document when unset; flags
/// and environment variables land here already folded by the frontend.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub proxy_name: Option<String>,
    pub category: Option<String>,
    pub proxy_base_path: Option<String>,
    pub target_server_name: Option<String>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proxy_name(mut self, name: impl Into<String>) -> Self {
        self.proxy_name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_proxy_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.proxy_base_path = Some(base_path.into());
        self
    }

    pub fn with_target_server_name(mut self, name: impl Into<String>) -> Self {
        self.target_server_name = Some(name.into());
        self
    }
}

/// Report produced by a successful generate run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub proxy_name: String,
    pub category: String,
    pub policies: Vec<String>,
    pub bundle_dir: PathBuf,
    pub archive_path: PathBuf,
    pub archive_digest: String,
}

/// Assembles the bundle tree and packages it into an archive.
#[derive(Debug)]
pub struct GenerateCommand {
    workspace: Workspace,
    config: DeployConfig,
}

impl GenerateCommand {
    /// Create a command, loading the configuration from the workspace.
    pub fn new(workspace: Workspace) -> Result<Self> {
        let config = DeployConfig::load(&workspace.config_file())?;
        Ok(Self { workspace, config })
    }

    pub fn execute(&self, options: &GenerateOptions) -> Result<GenerateReport> {
        let proxy_name = match options.proxy_name.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.proxy_name()?.to_string(),
        };
        let category = match options.category.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.proxy_category()?.to_string(),
        };
        let proxy_base_path = match options.proxy_base_path.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.proxy_base_path()?.to_string(),
        };
        let target_server_name = match options.target_server_name.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.target_server_name()?.to_string(),
        };
        let policies = self.config.category_policies(&category)?;

        let spec = BundleSpec {
            proxy_name: proxy_name.clone(),
            proxy_base_path,
            target_server_name,
            policies: policies.clone(),
        };
        let assembler = BundleAssembler::new(&self.workspace);
        let bundle_dir = assembler.assemble(&spec)?;

        let archive_path = self.workspace.archive_path(&proxy_name);
        let archive = archive::archive_bundle(&bundle_dir, &archive_path)?;

        Ok(GenerateReport {
            proxy_name,
            category,
            policies,
            bundle_dir,
            archive_path: archive.path,
            archive_digest: archive.digest,
        })
    }
}
