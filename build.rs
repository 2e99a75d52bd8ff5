use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    // HEAD's tag when building from a release commit, empty otherwise.
    let release = git(&["describe", "--tags", "--exact-match"]).unwrap_or_default();
    println!("cargo:rustc-env=RELEASE_VERSION={release}");

    // Latest reachable tag, so dev builds can report what they are ahead of.
    let latest = git(&["describe", "--tags", "--abbrev=0"]).unwrap_or_default();
    println!("cargo:rustc-env=LATEST_TAG={latest}");

    let ahead = if latest.is_empty() {
        String::new()
    } else {
        git(&["rev-list", "--count", &format!("{latest}..HEAD")]).unwrap_or_default()
    };
    println!("cargo:rustc-env=COMMITS_AHEAD={ahead}");
}
