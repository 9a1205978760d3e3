//! Bundle assembly: the `apiproxy` directory layout and its rendered files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::paths::Workspace;
use crate::template::{self, RenderMode, Substitutions};

/// Inputs for one bundle assembly run, already resolved from config,
/// environment, and flags.
#[derive(Debug, Clone)]
pub struct BundleSpec {
    pub proxy_name: String,
    pub proxy_base_path: String,
    pub target_server_name: String,
    /// Policy names in category order; rendering follows this order.
    pub policies: Vec<String>,
}

/// Assembles the `apiproxy` tree for one proxy.
#[derive(Debug)]
pub struct BundleAssembler<'a> {
    workspace: &'a Workspace,
}

impl<'a> BundleAssembler<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    /// Create (or reuse) the bundle layout and render every file.
    ///
    /// Policy rendering stops at the first missing template; files already
    /// rendered stay on disk. Returns the bundle directory.
    pub fn assemble(&self, spec: &BundleSpec) -> Result<PathBuf> {
        let bundle_dir = self.create_layout(&spec.proxy_name)?;
        self.render_policies(spec, &bundle_dir)?;
        self.render_proxy_endpoint(spec, &bundle_dir)?;
        self.render_target_endpoint(spec, &bundle_dir)?;
        Ok(bundle_dir)
    }

    fn create_layout(&self, proxy_name: &str) -> Result<PathBuf> {
        let bundle_dir = self.workspace.bundle_dir(proxy_name);
        for sub in ["policies", "proxies", "targets"] {
            fs::create_dir_all(bundle_dir.join(sub))?;
        }
        self.remove_stale_policies(&bundle_dir)?;
        Ok(bundle_dir)
    }

    // Policy files from an earlier run with a larger category would
    // otherwise survive into the new archive.
    fn remove_stale_policies(&self, bundle_dir: &Path) -> Result<()> {
        for entry in fs::read_dir(bundle_dir.join("policies"))? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "xml") {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn render_policies(&self, spec: &BundleSpec, bundle_dir: &Path) -> Result<()> {
        for policy in &spec.policies {
            let template = self.workspace.policy_template(policy);
            if !template.exists() {
                return Err(Error::PolicyTemplateMissing {
                    policy: policy.clone(),
                    path: template,
                });
            }
            let output = bundle_dir.join("policies").join(format!("{policy}.xml"));
            let subs = Substitutions::new()
                .with("proxy_name", spec.proxy_name.as_str())
                .with("policy_name", policy.as_str());
            template::render_file(&template, &output, &subs, RenderMode::Safe)?;
            info!("generated policy {}", output.display());
        }
        Ok(())
    }

    fn render_proxy_endpoint(&self, spec: &BundleSpec, bundle_dir: &Path) -> Result<()> {
        let template = self.workspace.proxy_endpoint_template();
        let output = bundle_dir.join("proxies").join("default.xml");
        let subs = Substitutions::new()
            .with("proxy_base_path", spec.proxy_base_path.as_str())
            .with("proxy_name", spec.proxy_name.as_str());
        template::render_file(&template, &output, &subs, RenderMode::Strict)?;
        info!("generated proxy endpoint {}", output.display());
        Ok(())
    }

    fn render_target_endpoint(&self, spec: &BundleSpec, bundle_dir: &Path) -> Result<()> {
        let template = self.workspace.target_endpoint_template();
        let output = bundle_dir.join("targets").join("default.xml");
        let subs = Substitutions::new()
            .with("target_server_name", spec.target_server_name.as_str())
            .with("proxy_name", spec.proxy_name.as_str());
        template::render_file(&template, &output, &subs, RenderMode::Strict)?;
        info!("generated target endpoint {}", output.display());
        Ok(())
    }
}
