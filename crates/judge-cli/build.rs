//! Stamps the binary with its version and the commit it was built from.
//!
//! `JUDGE_VERSION` is the package version, followed by `+<short hash>` when
//! the build runs inside a git checkout. Packagers without a checkout can set
//! `JUDGE_BUILD_COMMIT` instead.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=JUDGE_BUILD_COMMIT");

    let mut version = env!("CARGO_PKG_VERSION").to_string();
    if let Some(commit) = build_commit() {
        version.push('+');
        version.push_str(&commit);
    }

    println!("cargo:rustc-env=JUDGE_VERSION={}", version);
}

fn build_commit() -> Option<String> {
    if let Ok(commit) = std::env::var("JUDGE_BUILD_COMMIT") {
        let commit = commit.trim();
        return (!commit.is_empty()).then(|| commit.to_string());
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    if commit.is_empty() {
        return None;
    }

    let dirty = Command::new("git")
        .args(["status", "--porcelain", "--untracked-files=no"])
        .output()
        .is_ok_and(|output| output.status.success() && !output.stdout.is_empty());

    Some(if dirty {
        format!("{}.dirty", commit)
    } else {
        commit.to_string()
    })
}
