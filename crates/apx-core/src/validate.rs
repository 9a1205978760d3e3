//! Remote bundle validation against the management API.

use std::fs;
use std::path::Path;

use reqwest::blocking::multipart::{Form, Part};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Status and body of a successful validation call.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub status: u16,
    pub body: String,
}

/// Uploads bundle archives to the management validation endpoint.
#[derive(Debug)]
pub struct RemoteValidator {
    base_url: Url,
    token: String,
}

impl RemoteValidator {
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            base_url,
            token: token.into(),
        }
    }

    /// Management base URL for a cloud project.
    pub fn default_base_url(project_id: &str) -> Result<Url> {
        let url = format!("https://apigee.googleapis.com/v1/organizations/{project_id}");
        Ok(Url::parse(&url)?)
    }

    /// POST the archive to `<base>/apis?action=validate`, optionally scoped
    /// to one proxy name. A single blocking attempt; no retry.
    pub fn validate_bundle(
        &self,
        archive_path: &Path,
        proxy_name: Option<&str>,
    ) -> Result<ValidationOutcome> {
        if !archive_path.exists() {
            return Err(Error::ArchiveNotFound {
                path: archive_path.to_path_buf(),
            });
        }
        let bytes = fs::read(archive_path)?;
        let url = self.validation_url(proxy_name)?;
        debug!("uploading {} to {}", archive_path.display(), url);

        let part = Part::bytes(bytes)
            .file_name("apiproxy.zip")
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let client = reqwest::blocking::Client::builder()
            .user_agent("apx/0.1.0")
            .build()?;
        let response = client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::ValidationFailed {
                status: status.as_u16(),
                body,
            });
        }
        info!("validation succeeded with HTTP {}", status.as_u16());

        Ok(ValidationOutcome {
            status: status.as_u16(),
            body,
        })
    }

    fn validation_url(&self, proxy_name: Option<&str>) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = format!("{base}/apis?action=validate");
        if let Some(name) = proxy_name {
            url.push_str("&name=");
            url.push_str(name);
        }
        Ok(Url::parse(&url)?)
    }
}
