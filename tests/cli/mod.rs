use crate::common::CommandRamhogExt;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn test_help() {
    for flag in ["-h", "--help"] {
        Command::ramhog()
            .arg(flag)
            .assert()
            .success()
            .code(0)
            .stdout(contains("--chunk-size"))
            .stdout(contains("--max-alloc"))
            .stdout(contains("aggressive"))
            .stdout(contains("2G       - 2 GB"))
            .stderr(contains("starting memory allocation").not());
    }
}

#[test]
fn test_unknown_flag() {
    Command::ramhog()
        .arg("--bogus")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("--bogus"))
        .stderr(contains("starting memory allocation").not());
}

#[test]
fn test_version_is_unknown() {
    for flag in ["-V", "--version"] {
        Command::ramhog()
            .arg(flag)
            .assert()
            .failure()
            .code(1)
            .stdout(contains("ramhog 0.1.0").not())
            .stderr(contains(flag));
    }
}

#[test]
fn test_missing_argument() {
    Command::ramhog()
        .args(["--max-alloc", "10", "--chunk-size"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("--chunk-size"));
}

#[test]
fn test_invalid_chunk_size() {
    Command::ramhog()
        .args(["-c", "10K"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("invalid chunk size '10K'"));

    Command::ramhog()
        .args(["-c", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("invalid chunk size '0'"));
}

#[test]
fn test_invalid_speed() {
    Command::ramhog()
        .args(["--speed", "fast"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("fast"));
}
