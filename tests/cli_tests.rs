//! CLI surface tests for the `timeclock` binary.
//!
//! These run the compiled binary via `assert_cmd` with a scrubbed
//! environment. No store is needed: every case either stops at argument
//! parsing or at configuration resolution.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn timeclock() -> Command {
    let mut cmd = Command::cargo_bin("timeclock").unwrap();
    cmd.env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_SERVICE_ROLE_KEY")
        .env_remove("DATABASE_URL")
        .env_remove("PORT")
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn help_lists_subcommands() {
    timeclock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("jobs"))
        .stdout(predicate::str::contains("clock-in"));
}

#[test]
fn jobs_without_credentials_is_fatal() {
    timeclock()
        .arg("jobs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_URL"))
        .stderr(predicate::str::contains("SUPABASE_SERVICE_ROLE_KEY"));
}

#[test]
fn serve_with_half_a_supabase_pair_is_fatal() {
    timeclock()
        .env("SUPABASE_URL", "http://127.0.0.1:9")
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "SUPABASE_SERVICE_ROLE_KEY is required",
        ));
}

#[test]
fn clock_in_requires_pin_job_and_hours_flags() {
    timeclock()
        .args(["clock-in", "--pin", "1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--job-id"));
}

#[test]
fn serve_rejects_non_numeric_port() {
    timeclock()
        .args(["serve", "--port", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
