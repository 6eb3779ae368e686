use std::fs;
use std::path::Path;
use std::process::Command;

fn harbor_binary() -> String {
    env!("CARGO_BIN_EXE_harbor").to_string()
}

fn write_compose(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write compose file");
    path
}

const SIMPLE: &str = r#"
version: '2'
services:
  web:
    build: .
    links:
      - db
    environment:
      - DB_HOST=db
  db:
    image: postgres:9.6
"#;

#[test]
fn test_validate_accepts_good_descriptor() {
    let temp = tempfile::tempdir().unwrap();
    let file = write_compose(temp.path(), "docker-compose.yml", SIMPLE);

    let output = Command::new(harbor_binary())
        .args(["validate", file.to_str().unwrap()])
        .output()
        .expect("failed to run harbor validate");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OK (2 services)"));
}

#[test]
fn test_validate_rejects_missing_services() {
    let temp = tempfile::tempdir().unwrap();
    let file = write_compose(temp.path(), "docker-compose.yml", "version: '2'\n");

    let output = Command::new(harbor_binary())
        .args(["validate", file.to_str().unwrap()])
        .output()
        .expect("failed to run harbor validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("services"));
}

#[test]
fn test_parse_emits_json_batch() {
    let temp = tempfile::tempdir().unwrap();
    let file = write_compose(temp.path(), "docker-compose.yml", SIMPLE);

    let output = Command::new(harbor_binary())
        .args([
            "parse",
            file.to_str().unwrap(),
            "--repository",
            "my-repo",
            "--owner",
            "acme",
            "--domain",
            "example.net",
        ])
        .output()
        .expect("failed to run harbor parse");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be JSON");

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["metadata"]["name"], "web");
    assert_eq!(results[0]["metadata"]["isMain"], true);
    assert_eq!(results[0]["instance"]["name"], "my-repo-web");
    assert_eq!(
        results[0]["instance"]["env"][0],
        "DB_HOST=my-repo-db-staging-acme.example.net"
    );
    assert!(json["mains"]["builds"]["web"].is_object());
}

#[test]
fn test_merge_combines_descriptor_files() {
    let temp = tempfile::tempdir().unwrap();
    let base = write_compose(
        temp.path(),
        "docker-compose.yml",
        "services:\n  api:\n    build: .\n    environment:\n      - URL=BASE\n",
    );
    let overlay = write_compose(
        temp.path(),
        "docker-compose.override.yml",
        "services:\n  api:\n    extends:\n      service: api\n    environment:\n      - URL=TEST\n",
    );

    let output = Command::new(harbor_binary())
        .args([
            "merge",
            base.to_str().unwrap(),
            overlay.to_str().unwrap(),
            "--repository",
            "my-repo",
            "--owner",
            "acme",
            "--domain",
            "example.net",
        ])
        .output()
        .expect("failed to run harbor merge");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["instance"]["env"][0], "URL=TEST");
}
