//! Stamps the binary with `DNVM_VERSION`.
//!
//! Releases are tagged `vMAJOR.MINOR.PATCH`; inside a checkout the version
//! comes from the nearest such tag. Source tarballs fall back to the package
//! version.

use std::path::Path;
use std::process::Command;

fn main() {
    let repo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    for watched in [".git/HEAD", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={}", repo.join(watched).display());
    }

    let version = release_tag(&repo).unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
    println!("cargo:rustc-env=DNVM_VERSION={version}");
}

/// `1.2.3` on a tag, `1.2.3-4-gabc123` past it, with `-dev` for local edits.
fn release_tag(repo: &Path) -> Option<String> {
    let output = Command::new("git")
        .current_dir(repo)
        .args(["describe", "--tags", "--match", "v[0-9]*", "--dirty=-dev"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let version = described.trim().trim_start_matches('v');
    (!version.is_empty()).then(|| version.to_owned())
}
