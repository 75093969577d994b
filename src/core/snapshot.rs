/*
 * One-shot recursive listing of a processed root. The classifier works on
 * this snapshot instead of touching the filesystem again; directories and
 * files are listed alike, the root itself is excluded, and the result is
 * sorted so every later stage sees a deterministic order.
 */
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct DirectorySnapshot {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl DirectorySnapshot {
    /*
     * Walks `root` recursively. Unreadable entries are logged and left out;
     * the walk itself continues.
     */
    pub fn capture(root: &Path) -> Self {
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            match entry {
                Ok(entry) => paths.push(entry.into_path()),
                Err(err) => {
                    log::warn!(
                        "DirectorySnapshot: Skipping an unreadable entry under \"{}\": {err}.",
                        root.display()
                    );
                }
            }
        }
        paths.sort();
        log::debug!(
            "DirectorySnapshot: Captured {} paths under \"{}\".",
            paths.len(),
            root.display()
        );
        DirectorySnapshot {
            root: root.to_path_buf(),
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[cfg(test)]
    pub fn from_listing(root: PathBuf, mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        DirectorySnapshot { root, paths }
    }
}
