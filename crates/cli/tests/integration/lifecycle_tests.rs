//! Create, update and delete through the real self-exec proxy.

use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

#[test]
fn create_runs_init_then_build_and_writes_state() {
  let env = TestEnv::new();
  env.declare(json!({
    "definition_path": "base.pkr.hcl",
    "variables": { "region": "eu", "arch": "arm64" },
    "force_overwrite": true,
    "extra_arguments": ["-color=false"]
  }));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Image build created"));

  assert_eq!(
    env.calls(),
    vec![
      "init base.pkr.hcl".to_string(),
      "build -var arch=arm64 -var region=eu -force base.pkr.hcl -color=false".to_string(),
    ]
  );

  let state = env.state().expect("state should be written");
  assert!(!state["identity"].as_str().unwrap().is_empty());
  assert!(!state["version_marker"].as_str().unwrap().is_empty());
  assert_eq!(state["definition_path"], "base.pkr.hcl");
}

#[test]
fn create_defaults_definition_to_current_dir() {
  let env = TestEnv::new();
  env.declare(json!({}));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success();

  assert_eq!(env.calls(), vec!["init .".to_string(), "build .".to_string()]);
}

#[test]
fn create_failure_reports_tool_output_and_writes_no_state() {
  let env = TestEnv::new();
  env.declare(json!({}));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .env("FAIL_ON", "build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build failed"))
    .stderr(predicate::str::contains("tool error: boom"));

  assert!(env.state().is_none());
}

#[test]
fn init_failure_skips_build() {
  let env = TestEnv::new();
  env.declare(json!({}));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .env("FAIL_ON", "init")
    .assert()
    .failure()
    .stderr(predicate::str::contains("initialize failed"));

  assert_eq!(env.calls(), vec!["init .".to_string()]);
  assert!(env.state().is_none());
}

#[test]
fn create_twice_is_refused() {
  let env = TestEnv::new();
  env.declare(json!({}));

  env.imgbuild().arg("create").arg("--config").arg(&env.config_path).assert().success();

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  // Second attempt never reached the build tool.
  assert_eq!(env.calls().len(), 2);
}

#[test]
fn create_with_missing_config_fails() {
  let env = TestEnv::new();

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(env.temp.path().join("nope.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load declaration"));

  assert!(env.calls().is_empty());
}

#[test]
fn declared_environment_reaches_the_tool() {
  let env = TestEnv::new();
  env.declare(json!({ "environment": { "FAIL_ON": "build" } }));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("build failed"));
}

#[test]
fn configured_tool_is_used_without_ambient_environment() {
  let env = TestEnv::new();
  env.declare(json!({
    "inherit_ambient_environment": false,
    "environment": { "CALL_LOG": env.call_log.display().to_string() }
  }));

  env
    .imgbuild()
    .arg("create")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success();

  assert_eq!(env.calls(), vec!["init .".to_string(), "build .".to_string()]);
  assert!(env.state().is_some());
}

#[test]
fn update_keeps_identity_and_refreshes_version() {
  let env = TestEnv::new();
  env.declare(json!({ "variables": { "release": "1" } }));
  env.imgbuild().arg("create").arg("--config").arg(&env.config_path).assert().success();
  let before = env.state().unwrap();

  env.declare(json!({ "variables": { "release": "2" } }));
  env
    .imgbuild()
    .arg("update")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Image build updated"));

  let after = env.state().unwrap();
  assert_eq!(after["identity"], before["identity"]);
  assert_ne!(after["version_marker"], before["version_marker"]);
  assert_eq!(after["variables"]["release"], "2");
  assert_eq!(env.calls().last().unwrap(), "build -var release=2 .");
}

#[test]
fn identity_in_declaration_file_is_ignored() {
  let env = TestEnv::new();
  env.declare(json!({ "identity": "from-config", "version_marker": "from-config" }));
  env.imgbuild().arg("create").arg("--config").arg(&env.config_path).assert().success();
  let created = env.state().unwrap();
  assert_ne!(created["identity"], "from-config");
  assert_ne!(created["version_marker"], "from-config");

  env.imgbuild().arg("update").arg("--config").arg(&env.config_path).assert().success();

  assert_eq!(env.state().unwrap()["identity"], created["identity"]);
}

#[test]
fn failed_update_leaves_state_untouched() {
  let env = TestEnv::new();
  env.declare(json!({}));
  env.imgbuild().arg("create").arg("--config").arg(&env.config_path).assert().success();
  let before = env.state().unwrap();

  env
    .imgbuild()
    .arg("update")
    .arg("--config")
    .arg(&env.config_path)
    .env("FAIL_ON", "build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build failed"));

  assert_eq!(env.state().unwrap(), before);
}

#[test]
fn update_without_state_fails() {
  let env = TestEnv::new();
  env.declare(json!({}));

  env
    .imgbuild()
    .arg("update")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("No state found"));

  assert!(env.calls().is_empty());
}

#[test]
fn imported_identity_survives_update() {
  let env = TestEnv::new();
  env.declare(json!({}));
  env.imgbuild().args(["import", "adopted-image"]).assert().success();

  env.imgbuild().arg("update").arg("--config").arg(&env.config_path).assert().success();

  assert_eq!(env.state().unwrap()["identity"], "adopted-image");
}

#[test]
fn delete_never_runs_the_tool() {
  let env = TestEnv::new();
  env.declare(json!({}));
  env.imgbuild().arg("create").arg("--config").arg(&env.config_path).assert().success();

  env.imgbuild().arg("delete").assert().success();

  assert!(env.state().is_none());
  assert_eq!(env.calls().len(), 2);
}

#[test]
fn timeout_kills_a_hung_tool() {
  let env = TestEnv::new();
  let slow = env.temp.path().join("slow-packer");
  std::fs::write(&slow, "#!/bin/sh\nexec sleep 5\n").unwrap();
  let mut perms = std::fs::metadata(&slow).unwrap().permissions();
  std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o755);
  std::fs::set_permissions(&slow, perms).unwrap();
  env.declare(json!({}));

  env
    .imgbuild()
    .env("IMGBUILD_TOOL", &slow)
    .args(["create", "--timeout", "1s", "--config"])
    .arg(&env.config_path)
    .timeout(std::time::Duration::from_secs(20))
    .assert()
    .failure()
    .stderr(predicate::str::contains("initialize failed"));

  assert!(env.state().is_none());
}
