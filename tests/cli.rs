//! Operator CLI driven as a subprocess.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};

const CLI: &str = env!("CARGO_BIN_EXE_pii-shield-cli");

fn run(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(CLI)
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }
    child.wait_with_output().unwrap()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_redact_uses_config_extra_keys() {
    let config = config_file("[redaction]\nextra_keys = [\"dateOfBirth\"]\n");
    let path = config.path().to_str().unwrap();
    let input = json!({
        "applicant": {
            "name": "Ana",
            "ssn": "123-45-6789",
            "dateOfBirth": "1990-01-01",
            "address": { "city": "Austin" }
        }
    });

    let output = run(&["--config", path, "redact"], Some(&input.to_string()));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let redacted: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(redacted["applicant"]["ssn"], "[REDACTED]");
    assert_eq!(redacted["applicant"]["dateOfBirth"], "[REDACTED]");
    assert_eq!(redacted["applicant"]["name"], "Ana");
    assert_eq!(redacted["applicant"]["address"]["city"], "Austin");
}

#[test]
fn test_redact_without_config_keeps_unlisted_keys() {
    let input = json!({ "dateOfBirth": "1990-01-01", "password": "hunter2" });
    let output = run(&["redact"], Some(&input.to_string()));
    assert!(output.status.success());

    let redacted: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(redacted["dateOfBirth"], "1990-01-01");
    assert_eq!(redacted["password"], "[REDACTED]");
}

#[test]
fn test_redact_rejects_invalid_json() {
    let output = run(&["redact"], Some("{not json"));
    assert!(!output.status.success());
}

#[test]
fn test_check_config() {
    let config = config_file("[rate_limit.auth]\nwindow_ms = 60000\nmax = 3\n");
    let output = run(&["check-config", config.path().to_str().unwrap()], None);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Configuration OK"));
    assert!(stdout.contains("max = 3"));
}

#[test]
fn test_check_config_rejects_invalid_file() {
    let config = config_file("[rate_limit\n");
    let output = run(&["check-config", config.path().to_str().unwrap()], None);
    assert!(!output.status.success());
}

#[test]
fn test_mask_ssn() {
    let output = run(&["mask-ssn", "123-45-6789"], None);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "***-**-6789");
}
