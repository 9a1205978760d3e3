//! Validate command: upload the bundle archive for a remote check.

use std::path::PathBuf;

use serde::Serialize;
use url::Url;

use crate::config::DeployConfig;
use crate::error::Result;
use crate::paths::Workspace;
use crate::validate::RemoteValidator;

/// Options for the validate command.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Bearer token for the management API.
    pub token: String,
    pub proxy_name: Option<String>,
    /// Management base URL; defaults to the cloud project endpoint.
    pub management_url: Option<Url>,
    /// Scope the request to the proxy name instead of the generic endpoint.
    pub scope_to_proxy: bool,
}

impl ValidateOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            proxy_name: None,
            management_url: None,
            scope_to_proxy: false,
        }
    }

    pub fn with_proxy_name(mut self, name: impl Into<String>) -> Self {
        self.proxy_name = Some(name.into());
        self
    }

    pub fn with_management_url(mut self, url: Url) -> Self {
        self.management_url = Some(url);
        self
    }

    pub fn with_scope_to_proxy(mut self, scoped: bool) -> Self {
        self.scope_to_proxy = scoped;
        self
    }
}

/// Report produced by a successful validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub proxy_name: String,
    pub archive_path: PathBuf,
    pub status: u16,
    pub body: String,
}

/// Rediscovers the archive by convention and uploads it for validation.
#[derive(Debug)]
pub struct ValidateCommand {
    workspace: Workspace,
    config: DeployConfig,
}

impl ValidateCommand {
    /// Create a command, loading the configuration from the workspace.
    pub fn new(workspace: Workspace) -> Result<Self> {
        let config = DeployConfig::load(&workspace.config_file())?;
        Ok(Self { workspace, config })
    }

    pub fn execute(&self, options: &ValidateOptions) -> Result<ValidateReport> {
        let proxy_name = match options.proxy_name.as_deref() {
            Some(value) => value.to_string(),
            None => self.config.proxy_name()?.to_string(),
        };
        let archive_path = self.workspace.archive_path(&proxy_name);

        let base_url = match &options.management_url {
            Some(url) => url.clone(),
            None => RemoteValidator::default_base_url(self.config.gcp_project_id()?)?,
        };
        let validator = RemoteValidator::new(base_url, options.token.as_str());

        let scoped = options.scope_to_proxy.then_some(proxy_name.as_str());
        let outcome = validator.validate_bundle(&archive_path, scoped)?;

        Ok(ValidateReport {
            proxy_name,
            archive_path,
            status: outcome.status,
            body: outcome.body,
        })
    }
}
