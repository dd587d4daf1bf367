//! §6 "File system. Abstracted: `file_exists`, `read_all_text`,
//! `get_files(dir, pattern, recursive)`. The parser itself consumes
//! strings; file I/O is the caller's."
//!
//! [`Project::load_scripts`](crate::Project::load_scripts) takes source
//! text directly and never touches a disk. This trait exists only for
//! hosts that *do* want the orchestrator to walk a directory for them;
//! [`StdFileSystem`] is the obvious real implementation, kept here rather
//! than inline so a test can swap in an in-memory one without touching
//! [`crate::Project`].

use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn file_exists(&self, path: &str) -> bool;
    fn read_all_text(&self, path: &str) -> std::io::Result<String>;
    fn get_files(&self, dir: &str, pattern: &str, recursive: bool) -> std::io::Result<Vec<String>>;
}

/// The real-disk implementation. `pattern` is matched against the file
/// name's suffix (GDScript has one meaningful extension, `.gd`; no need
/// for a full glob engine here).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn read_all_text(&self, path: &str) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn get_files(&self, dir: &str, pattern: &str, recursive: bool) -> std::io::Result<Vec<String>> {
        let mut out = Vec::new();
        collect_files(Path::new(dir), pattern, recursive, &mut out)?;
        Ok(out)
    }
}

fn collect_files(dir: &Path, pattern: &str, recursive: bool, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, pattern, recursive, out)?;
            }
            continue;
        }
        if path.to_string_lossy().ends_with(pattern) {
            out.push(path.to_string_lossy().into_owned());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_gd_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.gd"), "extends Node\n").unwrap();
        std::fs::write(dir.path().join("sub/b.gd"), "extends Node\n").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a script").unwrap();

        let fs = StdFileSystem;
        let mut files = fs.get_files(dir.path().to_str().unwrap(), ".gd", true).unwrap();
        files.sort();
        assert_eq!(files.len(), 2);
    }
}
