//! High-level commands for the generate, validate, and deploy stages.
//!
//! Each stage is a stateless, single-shot operation: a command loads its
//! inputs from the workspace and configuration, runs to completion, and
//! returns a report for the frontend to print. No state is shared between
//! stages; the archive path convention is the only contract.

pub mod deploy;
pub mod generate;
pub mod validate;

pub use deploy::{DeployCommand, DeployOptions, DeployReport};
pub use generate::{GenerateCommand, GenerateOptions, GenerateReport};
pub use validate::{ValidateCommand, ValidateOptions, ValidateReport};
