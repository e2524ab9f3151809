// tests/startup_tests.rs

use std::process::{Command, Output};

/// Runs the binary with a clean environment plus `vars`, from an empty
/// directory so no stray `.env` is picked up.
fn run_with_env(vars: &[(&str, &str)]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_chromabot"))
        .env_clear()
        .envs(vars.iter().copied())
        .current_dir(dir.path())
        .output()
        .unwrap()
}

#[test]
fn missing_configuration_exits_with_status_one_and_lists_every_name() {
    let out = run_with_env(&[]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Please set the following environment variables:"));
    assert!(stderr.contains("TWITCH_CLIENT_ID, TWITCH_USERNAME, TWITCH_TOKEN, TWITCH_CHANNELS"), "{stderr}");
}

#[test]
fn only_the_missing_token_is_reported() {
    let out = run_with_env(&[
        ("TWITCH_CLIENT_ID", "cid"),
        ("TWITCH_USERNAME", "botuser"),
        ("TWITCH_CHANNELS", "chan"),
    ]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    let last = stderr.lines().last().unwrap_or_default();
    assert_eq!(last, "TWITCH_TOKEN");
}

#[test]
fn single_color_palette_is_rejected_at_startup() {
    let out = run_with_env(&[
        ("TWITCH_CLIENT_ID", "cid"),
        ("TWITCH_USERNAME", "botuser"),
        ("TWITCH_TOKEN", "tok"),
        ("TWITCH_CHANNELS", "chan"),
        ("COLORS", "#FF0000"),
    ]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("palette needs at least two colors, got 1"), "{stderr}");
}
