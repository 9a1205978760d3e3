//! Tests for the deploy command using a stub build tool.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use apx_core::commands::{DeployCommand, DeployOptions};
use apx_core::error::Error;
use apx_core::paths::Workspace;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Write an executable stub standing in for the build tool.
fn write_stub_tool(temp: &TempDir, script_body: &str) -> PathBuf {
    let path = temp.path().join("stub-mvn");
    write_file(&path, &format!("#!/bin/sh\n{script_body}\n"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn setup_workspace(temp: &TempDir) -> Workspace {
    let workspace = Workspace::new(temp.path());
    write_file(
        &workspace.config_file(),
        r#"{"proxy_name": "orders-api", "gcp_project_id": "acme-dev"}"#,
    );
    write_file(&workspace.pom_file(), "<project/>");
    write_file(
        &workspace.archive_path("orders-api"),
        "PK stub archive bytes",
    );
    workspace
}

#[test]
fn deploy_succeeds_when_the_tool_exits_zero() {
    let temp = TempDir::new().unwrap();
    let workspace = setup_workspace(&temp);
    let args_file = temp.path().join("args.txt");
    let tool = write_stub_tool(
        &temp,
        &format!(
            "echo \"$@\" > {0}\necho \"token=$GCP_ACCESS_TOKEN\" >> {0}",
            args_file.display()
        ),
    );

    let cmd = DeployCommand::new(workspace.clone()).unwrap();
    let report = cmd
        .execute(&DeployOptions::new("ya29.test").with_tool(&tool))
        .unwrap();

    assert_eq!(report.proxy_name, "orders-api");
    assert_eq!(report.env_name, "dev-00");
    assert_eq!(report.project_id, "acme-dev");

    let args = fs::read_to_string(&args_file).unwrap();
    assert!(args.contains("clean install -Pgoogleapi"));
    assert!(args.contains("-Denv=dev-00"));
    assert!(args.contains("-Dorg=acme-dev"));
    assert!(args.contains(&format!(
        "-Dapigee.proxy.bundle.path={}",
        workspace.archive_path("orders-api").display()
    )));
    assert!(args.contains(&format!("-f {}", workspace.pom_file().display())));
    assert!(args.contains("token=ya29.test"));
}

#[test]
fn env_name_override_reaches_the_tool() {
    let temp = TempDir::new().unwrap();
    let workspace = setup_workspace(&temp);
    let args_file = temp.path().join("args.txt");
    let tool = write_stub_tool(&temp, &format!("echo \"$@\" > {}", args_file.display()));

    let cmd = DeployCommand::new(workspace).unwrap();
    let report = cmd
        .execute(
            &DeployOptions::new("ya29.test")
                .with_env_name("prod-01")
                .with_tool(&tool),
        )
        .unwrap();

    assert_eq!(report.env_name, "prod-01");
    let args = fs::read_to_string(&args_file).unwrap();
    assert!(args.contains("-Denv=prod-01"));
}

#[test]
fn nonzero_exit_is_a_deployment_failure_with_stderr() {
    let temp = TempDir::new().unwrap();
    let workspace = setup_workspace(&temp);
    let tool = write_stub_tool(&temp, "echo 'BUILD FAILURE: bundle rejected' >&2\nexit 3");

    let cmd = DeployCommand::new(workspace).unwrap();
    let err = cmd
        .execute(&DeployOptions::new("ya29.test").with_tool(&tool))
        .unwrap_err();

    match err {
        Error::DeploymentFailed { status, stderr } => {
            assert_eq!(status.code(), Some(3));
            assert!(stderr.contains("BUILD FAILURE: bundle rejected"));
        }
        other => panic!("expected DeploymentFailed, got {other:?}"),
    }
}

#[test]
fn missing_archive_fails_before_the_tool_runs() {
    let temp = TempDir::new().unwrap();
    let workspace = Workspace::new(temp.path());
    write_file(
        &workspace.config_file(),
        r#"{"proxy_name": "orders-api", "gcp_project_id": "acme-dev"}"#,
    );
    let marker = temp.path().join("ran.txt");
    let tool = write_stub_tool(&temp, &format!("touch {}", marker.display()));

    let cmd = DeployCommand::new(workspace).unwrap();
    let err = cmd
        .execute(&DeployOptions::new("ya29.test").with_tool(&tool))
        .unwrap_err();

    assert!(matches!(err, Error::ArchiveNotFound { .. }));
    assert!(!marker.exists());
}
