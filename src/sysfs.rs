//! Kernel interface attributes from /sys/class/net.
//!
//! The [`AttributeSource`] trait is the only way the rest of the crate reads
//! per-interface kernel state. [`Sysfs`] implements it against a directory
//! tree, which defaults to `/sys/class/net` and can point at a fixture tree.

use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the kernel network interface tree.
pub const DEFAULT_SYSFS_NET: &str = "/sys/class/net";

/// Read-only access to per-interface kernel attributes.
pub trait AttributeSource: Send + Sync {
    /// Trimmed contents of `<iface>/<attr>`, `None` if unreadable.
    fn read(&self, iface: &str, attr: &str) -> Option<String>;

    /// Raw lines of `<iface>/<attr>`.
    fn read_lines(&self, iface: &str, attr: &str) -> Option<Vec<String>> {
        self.read(iface, attr)
            .map(|s| s.lines().map(str::to_string).collect())
    }

    /// Whether `<iface>/<attr>` exists (file, directory or link).
    fn exists(&self, iface: &str, attr: &str) -> bool;

    /// Entry names of the directory `<iface>/<attr>`.
    fn list(&self, iface: &str, attr: &str) -> Option<Vec<String>>;

    /// Final path component of the link `<iface>/<attr>`.
    fn link_name(&self, iface: &str, attr: &str) -> Option<String>;

    /// All interface names currently known to the kernel.
    fn interfaces(&self) -> Vec<String>;
}

/// Attribute source backed by a sysfs-style directory tree.
#[derive(Debug, Clone)]
pub struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_NET)
    }
}

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, iface: &str, attr: &str) -> PathBuf {
        self.root.join(iface).join(attr)
    }
}

impl AttributeSource for Sysfs {
    fn read(&self, iface: &str, attr: &str) -> Option<String> {
        fs::read_to_string(self.path(iface, attr))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn exists(&self, iface: &str, attr: &str) -> bool {
        // symlink_metadata so dangling links still count
        fs::symlink_metadata(self.path(iface, attr)).is_ok()
    }

    fn list(&self, iface: &str, attr: &str) -> Option<Vec<String>> {
        let entries = fs::read_dir(self.path(iface, attr)).ok()?;
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Some(names)
    }

    fn link_name(&self, iface: &str, attr: &str) -> Option<String> {
        let target = fs::read_link(self.path(iface, attr)).ok()?;
        target
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }

    fn interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .flatten()
                .filter_map(|e| e.file_name().into_string().ok())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let swp1 = dir.path().join("swp1");
        fs::create_dir_all(swp1.join("brport")).unwrap();
        fs::write(swp1.join("mtu"), "9216\n").unwrap();
        fs::create_dir_all(dir.path().join("br0/brif")).unwrap();
        fs::write(dir.path().join("br0/brif/swp1"), "").unwrap();
        symlink("../../br0", swp1.join("brport/bridge")).unwrap();
        dir
    }

    #[test]
    fn test_read_trims_value() {
        let dir = tree();
        let sysfs = Sysfs::new(dir.path());
        assert_eq!(sysfs.read("swp1", "mtu").as_deref(), Some("9216"));
        assert_eq!(sysfs.read("swp1", "speed"), None);
    }

    #[test]
    fn test_exists_list_and_link() {
        let dir = tree();
        let sysfs = Sysfs::new(dir.path());
        assert!(sysfs.exists("swp1", "brport"));
        assert!(!sysfs.exists("swp1", "bonding_slave"));
        assert_eq!(sysfs.list("br0", "brif"), Some(vec!["swp1".to_string()]));
        assert_eq!(sysfs.link_name("swp1", "brport/bridge").as_deref(), Some("br0"));
        assert_eq!(sysfs.interfaces(), vec!["br0".to_string(), "swp1".to_string()]);
    }

    #[test]
    fn test_missing_root_enumerates_nothing() {
        let sysfs = Sysfs::new("/nonexistent/netshow/sys/class/net");
        assert!(sysfs.interfaces().is_empty());
    }
}
