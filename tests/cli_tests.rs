//! Integration tests for the kubebind CLI
//!
//! These run the binary against charts in temporary directories. Nothing here
//! needs a cluster: commands that would call out to a tool either stop
//! before doing so or are pointed at a binary that does not exist.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VALUES: &str = r#"replicaCount: 1
serviceEnv:
  - name: redis
    value: redis.cache.svc.cluster.local
serviceCatalogEnv:
  - name: mysql
    vars:
      - host
      - port
"#;

/// kubebind with an empty config so the user's own file is never read
fn kubebind_cmd(temp_dir: &TempDir) -> Command {
    let config = temp_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }

    let mut cmd = Command::cargo_bin("kubebind").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn write_chart(dir: &Path, values: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Chart.yaml"), "apiVersion: v2\nname: app\n").unwrap();
    fs::write(dir.join("values.yaml"), values).unwrap();
    dir.to_path_buf()
}

#[test]
fn test_help_flag() {
    let temp_dir = TempDir::new().unwrap();
    kubebind_cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Helm chart values"))
        .stdout(predicate::str::contains("external"));
}

#[test]
fn test_list_bindings() {
    let temp_dir = TempDir::new().unwrap();
    let chart = write_chart(&temp_dir.path().join("app"), VALUES);

    kubebind_cmd(&temp_dir)
        .arg("bindings")
        .arg("--chart")
        .arg(&chart)
        .assert()
        .success()
        .stdout(predicate::str::contains("serviceEnv\tredis"))
        .stdout(predicate::str::contains("serviceCatalogEnv\tmysql"));
}

#[test]
fn test_list_bindings_of_one_kind() {
    let temp_dir = TempDir::new().unwrap();
    write_chart(&temp_dir.path().join("app"), VALUES);

    kubebind_cmd(&temp_dir)
        .args(["bindings", "--kind", "external", "--workspace"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mysql"))
        .stdout(predicate::str::contains("redis").not());
}

#[test]
fn test_remove_service_binding() {
    let temp_dir = TempDir::new().unwrap();
    let chart = write_chart(&temp_dir.path().join("app"), VALUES);

    kubebind_cmd(&temp_dir)
        .args(["service", "remove", "--name", "redis", "--chart"])
        .arg(&chart)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated binding redis"));

    let values = fs::read_to_string(chart.join("values.yaml")).unwrap();
    assert!(!values.contains("redis"));
    assert!(values.contains("mysql"));
    assert!(values.contains("replicaCount"));
}

#[test]
fn test_remove_external_binding() {
    let temp_dir = TempDir::new().unwrap();
    let chart = write_chart(&temp_dir.path().join("app"), VALUES);

    kubebind_cmd(&temp_dir)
        .args(["external", "remove", "--name", "mysql", "--chart"])
        .arg(&chart)
        .assert()
        .success();

    let values = fs::read_to_string(chart.join("values.yaml")).unwrap();
    assert!(!values.contains("mysql"));
    assert!(values.contains("redis"));
}

#[test]
fn test_remove_unknown_name() {
    let temp_dir = TempDir::new().unwrap();
    let chart = write_chart(&temp_dir.path().join("app"), VALUES);

    kubebind_cmd(&temp_dir)
        .args(["service", "remove", "--name", "nope", "--chart"])
        .arg(&chart)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' is not one of: redis"));
}

#[test]
fn test_remove_with_nothing_bound() {
    let temp_dir = TempDir::new().unwrap();
    let chart = write_chart(&temp_dir.path().join("app"), "replicaCount: 1\n");

    kubebind_cmd(&temp_dir)
        .args(["external", "remove", "--chart"])
        .arg(&chart)
        .assert()
        .success()
        .stdout(predicate::str::contains("No Services to remove."));
}

#[test]
fn test_workspace_without_charts() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("empty");
    fs::create_dir(&workspace).unwrap();

    kubebind_cmd(&temp_dir)
        .args(["bindings", "--workspace"])
        .arg(&workspace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: No charts found"));
}

#[test]
fn test_missing_workspace() {
    let temp_dir = TempDir::new().unwrap();

    kubebind_cmd(&temp_dir)
        .args(["service", "add", "--workspace"])
        .arg(temp_dir.path().join("gone"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("This command requires an open folder."));
}

#[test]
fn test_several_charts_without_terminal() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    write_chart(&workspace.join("web"), VALUES);
    write_chart(&workspace.join("api"), VALUES);

    kubebind_cmd(&temp_dir)
        .args(["bindings", "--workspace"])
        .arg(&workspace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Candidates: api, web"));
}

#[test]
fn test_malformed_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("broken.toml");
    fs::write(&config, "kubectl = [").unwrap();

    Command::cargo_bin("kubebind")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["top", "node", "n1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_configured_tool_path_is_used() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "kubectl = \"/nonexistent/kubectl\"\n",
    )
    .unwrap();

    kubebind_cmd(&temp_dir)
        .args(["top", "pod", "web-0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to run /nonexistent/kubectl"));
}

#[test]
fn test_cluster_create_dry_run() {
    let temp_dir = TempDir::new().unwrap();

    kubebind_cmd(&temp_dir)
        .args(["cluster", "create", "--image-version", "v1.29.2", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== Cluster Settings =="))
        .stdout(predicate::str::contains(
            "kind create cluster --image kindest/node:v1.29.2",
        ));
}

#[test]
fn test_cluster_create_dry_run_latest() {
    let temp_dir = TempDir::new().unwrap();

    kubebind_cmd(&temp_dir)
        .args(["cluster", "create", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Image version: latest"))
        .stdout(predicate::str::contains("--image").not());
}

#[test]
fn test_unknown_binding_kind() {
    let temp_dir = TempDir::new().unwrap();

    kubebind_cmd(&temp_dir)
        .args(["bindings", "--kind", "bogus"])
        .assert()
        .failure();
}
