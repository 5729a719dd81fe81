use std::fs;
use std::path::PathBuf;
use std::process::Command;

use heredity::report::PosteriorReport;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn cli_prints_posteriors_and_writes_toml() {
    let tmp = tempdir().expect("temporary directory");
    let output_path = tmp.path().join("posteriors.toml");

    let exe = env!("CARGO_BIN_EXE_heredity");
    let output = Command::new(exe)
        .arg(fixture("family0.csv"))
        .arg("--output")
        .arg(&output_path)
        .arg("--quiet")
        .env("RUST_LOG", "warn")
        .output()
        .expect("run heredity cli");

    assert!(output.status.success(), "CLI exited with {:?}", output.status);
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(stdout.starts_with("Harry:\n  Gene:\n    2: 0.0092\n    1: 0.4557\n    0: 0.5351\n"));
    assert!(stdout.contains("  Trait:\n    True: 0.2665\n    False: 0.7335\n"));

    let report = PosteriorReport::load(&output_path).expect("report parses");
    assert_eq!(report.people.len(), 3);
    assert_eq!(report.people[2].name, "Lily");
    assert!(fs::read_to_string(&output_path).unwrap().contains("[people.gene]"));
}

#[test]
fn cli_sequential_mode_matches_default_output() {
    let exe = env!("CARGO_BIN_EXE_heredity");
    let run = |extra: &[&str]| {
        let output = Command::new(exe)
            .arg(fixture("family2.csv"))
            .args(extra)
            .arg("--quiet")
            .env("RUST_LOG", "off")
            .output()
            .expect("run heredity cli");
        assert!(output.status.success());
        output.stdout
    };

    assert_eq!(run(&[]), run(&["--sequential"]));
    assert_eq!(run(&[]), run(&["--threads", "2"]));
}

#[test]
fn cli_reports_malformed_input() {
    let tmp = tempdir().expect("temporary directory");
    let data_path = tmp.path().join("broken.csv");
    fs::write(&data_path, "name,mother,father,trait\nHarry,Lily,James,\n").expect("write data");

    let exe = env!("CARGO_BIN_EXE_heredity");
    let output = Command::new(exe)
        .arg(&data_path)
        .arg("--quiet")
        .env("RUST_LOG", "off")
        .output()
        .expect("run heredity cli");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr was: {stderr}");
    assert!(stderr.contains("Lily"), "stderr was: {stderr}");
}

#[test]
fn cli_rejects_conflicting_scheduling_flags() {
    let exe = env!("CARGO_BIN_EXE_heredity");
    let status = Command::new(exe)
        .arg(fixture("family0.csv"))
        .args(["--sequential", "--threads", "2"])
        .status()
        .expect("run heredity cli");
    assert!(!status.success());
}
