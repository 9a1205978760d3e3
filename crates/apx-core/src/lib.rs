//! Apx Core Library
//!
//! Domain logic for building, validating, and deploying API proxy bundles:
//! template rendering, bundle assembly, archiving, remote validation, and
//! build-tool deployment.

pub mod archive;
pub mod bundle;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod paths;
pub mod template;
pub mod validate;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{
        DeployCommand, DeployOptions, DeployReport, GenerateCommand, GenerateOptions,
        GenerateReport, ValidateCommand, ValidateOptions, ValidateReport,
    };

    // Configuration and paths
    pub use crate::config::DeployConfig;
    pub use crate::paths::Workspace;

    // Bundle pipeline
    pub use crate::archive::BundleArchive;
    pub use crate::bundle::{BundleAssembler, BundleSpec};
    pub use crate::template::{RenderMode, Substitutions};

    // External collaborators
    pub use crate::deploy::BuildToolDeployer;
    pub use crate::validate::{RemoteValidator, ValidationOutcome};

    // Errors
    pub use crate::error::{Error, Result};
}
