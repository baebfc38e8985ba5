use std::{fs, path::PathBuf, process::Command};

fn summoner() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_chaos-summoner"));
    let _ = command.env("RUST_LOG", "warn");
    command
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chaos-summoner-{}-{name}", std::process::id()))
}

#[test]
fn headless_run_prints_bounded_recent_list() {
    let output = summoner()
        .args(["--headless", "--presses", "7", "--seed", "42", "--no-drift"])
        .output()
        .expect("failed to launch chaos-summoner");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let summons = stdout
        .lines()
        .filter(|line| line.starts_with("summon #"))
        .count();
    let recent = stdout.lines().filter(|line| line.starts_with("  ")).count();

    assert_eq!(summons, 7);
    assert_eq!(recent, 5);
}

#[test]
fn headless_runs_replay_with_the_same_seed() {
    let run = || {
        summoner()
            .args(["--headless", "--presses", "30", "--seed", "9"])
            .output()
            .expect("failed to launch chaos-summoner")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn headless_run_skips_effect_synthesis() {
    let output = summoner()
        .args(["--headless", "--presses", "2", "--seed", "3", "--log-filter", "debug"])
        .output()
        .expect("failed to launch chaos-summoner");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting session"), "{stderr}");
    assert!(!stderr.contains("synthesized tone buffer"), "{stderr}");
}

#[test]
fn export_wav_writes_a_riff_file() {
    let path = scratch_path("effect.wav");
    let status = summoner()
        .args(["--seed", "1", "--export-wav"])
        .arg(&path)
        .status()
        .expect("failed to launch chaos-summoner");

    assert!(status.success());
    let bytes = fs::read(&path).expect("wav file written");
    let _ = fs::remove_file(&path);

    assert_eq!(&bytes[..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    // 13 230 stereo frames of 16-bit samples plus the header chunks.
    let payload = 13_230 * 4;
    assert!(bytes.len() > payload && bytes.len() <= payload + 80, "{}", bytes.len());
}

#[test]
fn config_file_values_are_honoured() {
    let path = scratch_path("config.toml");
    fs::write(&path, "version = 1\ndisplay_capacity = 2\ndrift_enabled = false\n")
        .expect("config written");

    let output = summoner()
        .args(["--headless", "--presses", "4", "--seed", "5", "--config"])
        .arg(&path)
        .output()
        .expect("failed to launch chaos-summoner");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let recent = stdout.lines().filter(|line| line.starts_with("  ")).count();
    assert_eq!(recent, 2);
}

#[test]
fn invalid_config_fails_the_run() {
    let path = scratch_path("invalid.toml");
    fs::write(&path, "version = 1\nloudness = 11\n").expect("config written");

    let output = summoner()
        .args(["--headless", "--config"])
        .arg(&path)
        .output()
        .expect("failed to launch chaos-summoner");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "{stderr}");
}
