/*
 * Host-system versus container path views. Every user-supplied path arrives
 * in the host-system view and is translated to the container view the tool
 * actually operates in, by prefix substitution. The prefix test is
 * component-wise, so "/mnt/dataX" does not count as living under
 * "/mnt/data".
 */
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MountMapping {
    host_prefix: PathBuf,
    container_prefix: PathBuf,
}

impl MountMapping {
    pub fn new(host_prefix: &Path, container_prefix: &Path) -> Self {
        MountMapping {
            host_prefix: host_prefix.to_path_buf(),
            container_prefix: container_prefix.to_path_buf(),
        }
    }

    /*
     * Rebases `host_path` onto the container prefix. None when the path does
     * not live under the host prefix.
     */
    pub fn to_container(&self, host_path: &Path) -> Option<PathBuf> {
        host_path
            .strip_prefix(&self.host_prefix)
            .ok()
            .map(|relative| self.container_prefix.join(relative))
    }

    pub fn host_prefix(&self) -> &Path {
        &self.host_prefix
    }

    pub fn container_prefix(&self) -> &Path {
        &self.container_prefix
    }
}
