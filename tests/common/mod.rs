//! Shared fixtures for integration tests: a fake kernel interface tree on
//! disk and a command runner returning canned output.

#![allow(dead_code)]

use netshow::{CommandRunner, ExecError, Host, PlatformPaths, Sysfs};
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const LSPCI_BROADCOM: &str = "\
00:00.0 Host bridge [0600]: Intel Corporation Atom Processor S1200 Internal [8086:0c00] (rev 02)
01:00.0 Ethernet controller [0200]: Broadcom Inc. and subsidiaries BCM56850 Switch ASIC [14e4:b850] (rev 03)
";

pub const LSPCI_NO_ASIC: &str = "\
00:00.0 Host bridge [0600]: Intel Corporation Atom Processor S1200 Internal [8086:0c00] (rev 02)
00:14.0 Ethernet controller [0200]: Intel Corporation Ethernet Connection I354 [8086:1f41] (rev 03)
";

pub fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

/// Canned command output keyed by full command line. Unknown commands
/// fail as if the program were not installed. Every call is recorded.
#[derive(Default)]
pub struct FakeRunner {
    outputs: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn with(mut self, cmdline: &str, output: &str) -> Self {
        self.outputs.insert(cmdline.to_string(), output.to_string());
        self
    }

    pub fn call_count(&self, cmdline: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == cmdline)
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ExecError> {
        let cmdline = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(cmdline.clone());
        self.outputs
            .get(&cmdline)
            .cloned()
            .ok_or_else(|| ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            })
    }
}

/// Builder for a fake /sys/class/net tree.
pub struct SysTree {
    pub dir: TempDir,
}

impl SysTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn iface(&self, name: &str) -> &Self {
        fs::create_dir_all(self.root().join(name)).unwrap();
        self
    }

    pub fn attr(&self, name: &str, attr: &str, value: &str) -> &Self {
        let path = self.root().join(name).join(attr);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{}\n", value)).unwrap();
        self
    }

    pub fn dir_attr(&self, name: &str, attr: &str) -> &Self {
        fs::create_dir_all(self.root().join(name).join(attr)).unwrap();
        self
    }

    pub fn link(&self, name: &str, attr: &str, target: &str) -> &Self {
        let path = self.root().join(name).join(attr);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        symlink(self.root().join(target), path).unwrap();
        self
    }

    /// Port with link state and optional live speed.
    pub fn port(&self, name: &str, admin_up: bool, oper: &str, speed: Option<&str>) -> &Self {
        self.iface(name);
        self.attr(name, "flags", if admin_up { "0x1003" } else { "0x1002" });
        self.attr(name, "operstate", oper);
        if let Some(speed) = speed {
            self.attr(name, "speed", speed);
        }
        self
    }

    pub fn bridge(&self, name: &str, members: &[&str]) -> &Self {
        self.iface(name).dir_attr(name, "bridge").dir_attr(name, "brif");
        for m in members {
            fs::write(self.root().join(name).join("brif").join(m), "").unwrap();
            let port = m.to_string();
            self.iface(&port).dir_attr(&port, "brport");
            self.link(&port, "brport/bridge", name);
        }
        self
    }

    pub fn bond(&self, name: &str, members: &[&str]) -> &Self {
        self.iface(name)
            .attr(name, "bonding/slaves", &members.join(" "))
            .attr(name, "bonding/mode", "802.3ad 4");
        for m in members {
            self.iface(m).dir_attr(m, "bonding_slave");
            self.link(m, "master", name);
        }
        self
    }

    pub fn host(&self, runner: FakeRunner, paths: PlatformPaths) -> Host {
        self.shared_host(Arc::new(runner), paths)
    }

    /// Like [`SysTree::host`], keeping a handle on the runner to inspect calls.
    pub fn shared_host(&self, runner: Arc<FakeRunner>, paths: PlatformPaths) -> Host {
        Host::new(Arc::new(Sysfs::new(self.root())), runner).with_paths(paths)
    }
}

/// Vendor files from tests/data.
pub fn fixture_paths() -> PlatformPaths {
    PlatformPaths {
        porttab: data_file("porttab"),
        bcm_config: data_file("config.bcm"),
    }
}

pub fn missing_paths() -> PlatformPaths {
    PlatformPaths {
        porttab: PathBuf::from("/nonexistent/netshow/porttab"),
        bcm_config: PathBuf::from("/nonexistent/netshow/config.bcm"),
    }
}
