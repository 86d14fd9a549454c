//! Run-fatal configuration errors abort before any work and write no report.

mod helpers;

use std::path::PathBuf;

use webscout::{run_pipeline, Config};

use helpers::{test_config, write_targets};

async fn fatal_message(config: Config) -> String {
    let out = config.out_dir.clone();
    let err = run_pipeline(config).await.unwrap_err();
    assert!(!out.join("webscout_session.json").exists());
    format!("{err:#}")
}

#[tokio::test]
async fn test_missing_output_directory() {
    let input = write_targets(&["example.com".to_string()]);
    let out = tempfile::tempdir().unwrap();
    let missing = out.path().join("nope");
    let msg = fatal_message(test_config(input.path(), &missing)).await;
    assert!(msg.contains("Output directory does not exist"), "{msg}");
}

#[tokio::test]
async fn test_output_path_is_a_file() {
    let input = write_targets(&["example.com".to_string()]);
    let msg = fatal_message(test_config(input.path(), input.path())).await;
    assert!(msg.contains("not a directory"), "{msg}");
}

#[tokio::test]
async fn test_invalid_port_specification() {
    let input = write_targets(&["example.com".to_string()]);
    let out = tempfile::tempdir().unwrap();
    let config = Config {
        ports: "80,99999".to_string(),
        ..test_config(input.path(), out.path())
    };
    let msg = fatal_message(config).await;
    assert!(msg.contains("Invalid port: \"99999\""), "{msg}");
}

#[tokio::test]
async fn test_unreadable_input() {
    let out = tempfile::tempdir().unwrap();
    let msg = fatal_message(test_config(
        &PathBuf::from("/definitely/missing/hosts.txt"),
        out.path(),
    ))
    .await;
    assert!(msg.contains("Cannot read input"), "{msg}");
}

#[tokio::test]
async fn test_invalid_ruleset() {
    let input = write_targets(&["example.com".to_string()]);
    let out = tempfile::tempdir().unwrap();
    let rules = out.path().join("rules.json");
    std::fs::write(&rules, "{not json").unwrap();
    let config = Config {
        fingerprints: Some(rules),
        ..test_config(input.path(), out.path())
    };
    let msg = fatal_message(config).await;
    assert!(msg.contains("fingerprint ruleset"), "{msg}");
}

#[tokio::test]
async fn test_ruleset_directory_is_rejected() {
    let input = write_targets(&["example.com".to_string()]);
    let out = tempfile::tempdir().unwrap();
    let rules_dir = tempfile::tempdir().unwrap();
    std::fs::write(rules_dir.path().join("rules.json"), "{not json").unwrap();
    let config = Config {
        fingerprints: Some(rules_dir.path().to_path_buf()),
        ..test_config(input.path(), out.path())
    };
    let msg = fatal_message(config).await;
    assert!(msg.contains("Cannot read fingerprint ruleset"), "{msg}");
}
