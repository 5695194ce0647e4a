use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("logs")
        .join(name)
}

/// Writes raw line bytes into a fresh log file. Keep the `TempDir` alive
/// for as long as the path is used.
pub fn write_log(lines: &[&[u8]]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("charger.log");

    let mut file = std::fs::File::create(&path).expect("log file should be creatable");
    for line in lines {
        file.write_all(line).expect("log line should be writable");
    }

    (dir, path)
}

pub fn write_text_log(lines: &[&str]) -> (TempDir, PathBuf) {
    let owned: Vec<String> = lines.iter().map(|line| format!("{line}\n")).collect();
    let bytes: Vec<&[u8]> = owned.iter().map(|line| line.as_bytes()).collect();
    write_log(&bytes)
}
