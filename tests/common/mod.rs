use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn tagtree_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagtree").unwrap();
    cmd.env_remove("TAGTREE_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a source document, creating parent directories
#[allow(dead_code)]
pub fn write_doc(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
