//! Deployment through the external build tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Invokes the build tool that uploads and deploys a bundle archive.
///
/// The tool runs synchronously with a fixed argument list; the deployment
/// profile, environment, project, and archive path are passed as
/// properties. Exit status zero is the only success signal.
#[derive(Debug)]
pub struct BuildToolDeployer {
    program: PathBuf,
    pom_file: PathBuf,
}

impl BuildToolDeployer {
    /// Default build tool program.
    pub const DEFAULT_PROGRAM: &'static str = "mvn";

    pub fn new(program: impl Into<PathBuf>, pom_file: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            pom_file: pom_file.into(),
        }
    }

    /// Run the build tool against an existing archive and wait for it.
    ///
    /// The access token is exported to the tool's environment; the tool
    /// authenticates against the management API with it.
    pub fn deploy(
        &self,
        archive_path: &Path,
        env_name: &str,
        project_id: &str,
        token: &str,
    ) -> Result<()> {
        if !archive_path.exists() {
            return Err(Error::ArchiveNotFound {
                path: archive_path.to_path_buf(),
            });
        }

        let mut command = Command::new(&self.program);
        command
            .env("GCP_ACCESS_TOKEN", token)
            .arg("clean")
            .arg("install")
            .arg("-Pgoogleapi")
            .arg(format!("-Denv={env_name}"))
            .arg(format!("-Dorg={project_id}"))
            .arg(format!(
                "-Dapigee.proxy.bundle.path={}",
                archive_path.display()
            ))
            .arg("-f")
            .arg(&self.pom_file);
        debug!("running {:?}", command);

        let output = command.output()?;
        if !output.status.success() {
            return Err(Error::DeploymentFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        info!("deployment completed ({})", output.status);
        Ok(())
    }
}
