//! Workspace path resolution.
//!
//! Every filesystem location the stages consume or produce is derived here
//! from a single base directory plus the proxy name. The generate stage
//! writes the archive where the validate and deploy stages look for it, so
//! no other module is allowed to concatenate stage-specific paths.

use std::path::{Path, PathBuf};

/// The directory layout all three stages operate in.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at the given base directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration document.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("configs").join("config.json")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Template file for one policy name.
    pub fn policy_template(&self, policy: &str) -> PathBuf {
        self.templates_dir()
            .join("policies")
            .join(format!("{policy}.xml"))
    }

    /// Template for the proxy endpoint descriptor.
    pub fn proxy_endpoint_template(&self) -> PathBuf {
        self.templates_dir()
            .join("bundle")
            .join("apiproxy")
            .join("proxies")
            .join("default.xml")
    }

    /// Template for the target endpoint descriptor.
    pub fn target_endpoint_template(&self) -> PathBuf {
        self.templates_dir()
            .join("bundle")
            .join("apiproxy")
            .join("targets")
            .join("default.xml")
    }

    /// Build-tool project file.
    pub fn pom_file(&self) -> PathBuf {
        self.root.join("pom.xml")
    }

    /// Per-proxy output root.
    pub fn proxy_root(&self, proxy_name: &str) -> PathBuf {
        self.root.join("out").join(proxy_name)
    }

    /// The `apiproxy` tree the assembler renders into.
    pub fn bundle_dir(&self, proxy_name: &str) -> PathBuf {
        self.proxy_root(proxy_name).join("apiproxy")
    }

    /// The archive the generate stage writes and the validate/deploy
    /// stages rediscover.
    pub fn archive_path(&self, proxy_name: &str) -> PathBuf {
        self.proxy_root(proxy_name).join("apiproxy.zip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_path_is_a_function_of_proxy_name_and_root() {
        let ws = Workspace::new("/srv/apx");
        assert_eq!(
            ws.archive_path("orders-api"),
            PathBuf::from("/srv/apx/out/orders-api/apiproxy.zip")
        );
    }

    #[test]
    fn bundle_dir_sits_under_the_proxy_root() {
        let ws = Workspace::new("/srv/apx");
        assert_eq!(
            ws.bundle_dir("orders-api"),
            ws.proxy_root("orders-api").join("apiproxy")
        );
    }

    #[test]
    fn policy_template_appends_xml_extension() {
        let ws = Workspace::new("/srv/apx");
        assert_eq!(
            ws.policy_template("verify-api-key"),
            PathBuf::from("/srv/apx/templates/policies/verify-api-key.xml")
        );
    }

    #[test]
    fn endpoint_templates_live_under_the_bundle_skeleton() {
        let ws = Workspace::new("/srv/apx");
        assert_eq!(
            ws.proxy_endpoint_template(),
            PathBuf::from("/srv/apx/templates/bundle/apiproxy/proxies/default.xml")
        );
        assert_eq!(
            ws.target_endpoint_template(),
            PathBuf::from("/srv/apx/templates/bundle/apiproxy/targets/default.xml")
        );
    }
}
