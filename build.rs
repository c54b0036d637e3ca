use std::process::Command;

// Embed the git revision reported by the health endpoint's version field.
fn main() {
    let rev = Command::new("git")
        .args(["describe", "--always", "--dirty=-dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=WLT_BUILD_REV={}", rev);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
