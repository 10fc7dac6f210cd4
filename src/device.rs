//! Host device profile.
//!
//! Reads the same facts a handset reports (model, OS release, CPU, screen,
//! features, sensors) from Linux sysfs and procfs. Roots are injectable so
//! tests can point the probe at a temporary tree.

use crate::model::{DeviceProfile, SensorInfo};
use log::debug;
use std::ffi::CStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields of `uname(2)` the profile needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnameInfo {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
}

impl UnameInfo {
    pub fn host() -> Option<Self> {
        // SAFETY: utsname is plain old data and uname only writes into it.
        let mut buf: libc::utsname = unsafe { std::mem::zeroed() };
        if unsafe { libc::uname(&mut buf) } != 0 {
            return None;
        }
        let field = |raw: &[libc::c_char]| {
            // SAFETY: uname NUL-terminates every field within its buffer.
            unsafe { CStr::from_ptr(raw.as_ptr()) }
                .to_string_lossy()
                .into_owned()
        };
        Some(Self {
            sysname: field(&buf.sysname),
            nodename: field(&buf.nodename),
            release: field(&buf.release),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeviceProbe {
    sys_root: PathBuf,
    proc_root: PathBuf,
    uname: Option<UnameInfo>,
}

impl DeviceProbe {
    pub fn host() -> Self {
        Self {
            sys_root: PathBuf::from("/sys"),
            proc_root: PathBuf::from("/proc"),
            uname: UnameInfo::host(),
        }
    }

    pub fn with_roots(sys_root: impl Into<PathBuf>, proc_root: impl Into<PathBuf>) -> Self {
        Self {
            sys_root: sys_root.into(),
            proc_root: proc_root.into(),
            uname: None,
        }
    }

    pub fn with_uname(mut self, uname: UnameInfo) -> Self {
        self.uname = Some(uname);
        self
    }

    /// Build the profile. Facts that cannot be read stay at their defaults.
    pub fn probe(&self) -> DeviceProfile {
        let (screen_width, screen_height) = self.screen_size().unwrap_or((0, 0));
        let mut profile = DeviceProfile {
            name: self.device_name(),
            os: self.os_description(),
            cpu_cores: cpu_cores(),
            cpu_speed_mhz: self.max_cpu_freq_mhz(),
            cpu_arch: std::env::consts::ARCH.to_string(),
            screen_width,
            screen_height,
            features: Vec::new(),
            sensors: self.sensors(),
        };
        profile.extend_features(self.cpu_features());
        profile
    }

    fn device_name(&self) -> String {
        let dmi = self.sys_root.join("class/dmi/id/product_name");
        if let Some(name) = read_trimmed(&dmi) {
            return name;
        }
        self.uname
            .as_ref()
            .map(|uname| uname.nodename.clone())
            .unwrap_or_default()
    }

    fn os_description(&self) -> String {
        match &self.uname {
            Some(uname) => format!("{} {}", uname.sysname, uname.release)
                .trim()
                .to_string(),
            None => std::env::consts::OS.to_string(),
        }
    }

    /// `cpuinfo_max_freq` is in kHz; the last parseable line wins.
    pub fn max_cpu_freq_mhz(&self) -> f32 {
        let path = self
            .sys_root
            .join("devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq");
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("{}: {err}", path.display());
                return 0.0;
            }
        };
        let mut freq = 0.0;
        for line in contents.lines() {
            match line.trim().parse::<f32>() {
                Ok(khz) => freq = khz / 1000.0,
                Err(err) => {
                    debug!("{}: invalid frequency {line:?}: {err}", path.display());
                    return 0.0;
                }
            }
        }
        freq
    }

    /// Preferred mode of the first connected DRM connector.
    fn screen_size(&self) -> Option<(u32, u32)> {
        let drm = self.sys_root.join("class/drm");
        for connector in sorted_entries(&drm) {
            let connected = read_trimmed(&connector.join("status"))
                .is_some_and(|status| status == "connected");
            if !connected {
                continue;
            }
            let Ok(modes) = fs::read_to_string(connector.join("modes")) else {
                continue;
            };
            if let Some(size) = modes.lines().find_map(parse_mode) {
                return Some(size);
            }
        }
        None
    }

    fn cpu_features(&self) -> Vec<String> {
        let cpuinfo = self.proc_root.join("cpuinfo");
        let Ok(contents) = fs::read_to_string(&cpuinfo) else {
            debug!("{} unreadable", cpuinfo.display());
            return Vec::new();
        };
        contents
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                matches!(key.trim(), "Features" | "flags").then_some(value)
            })
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// IIO devices: name plus the first `*_scale` channel as resolution.
    fn sensors(&self) -> Vec<SensorInfo> {
        let iio = self.sys_root.join("bus/iio/devices");
        sorted_entries(&iio)
            .into_iter()
            .filter_map(|device| {
                let name = read_trimmed(&device.join("name"))?;
                let resolution = sorted_entries(&device)
                    .into_iter()
                    .filter(|path| {
                        path.file_name()
                            .and_then(|name| name.to_str())
                            .is_some_and(|name| name.ends_with("_scale"))
                    })
                    .find_map(|path| read_trimmed(&path)?.parse::<f32>().ok())
                    .unwrap_or(0.0);
                Some(SensorInfo {
                    name,
                    max_range: 0.0,
                    resolution,
                })
            })
            .collect()
    }
}

fn cpu_cores() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

fn read_trimmed(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();
    paths
}

fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (width, height) = line.trim().split_once('x')?;
    // Interlaced modes carry a trailing `i`.
    let height = height.trim_end_matches(|c: char| !c.is_ascii_digit());
    Some((width.parse().ok()?, height.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write fixture");
    }

    fn fixture() -> (TempDir, DeviceProbe) {
        let dir = TempDir::new().expect("tempdir");
        let sys = dir.path().join("sys");
        let proc_root = dir.path().join("proc");
        write(&sys, "class/dmi/id/product_name", "ThinkPad X13s\n");
        write(
            &sys,
            "devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq",
            "1200000\n2995200\n",
        );
        write(&sys, "class/drm/card0-DP-1/status", "disconnected\n");
        write(&sys, "class/drm/card0-DP-1/modes", "3840x2160\n");
        write(&sys, "class/drm/card0-eDP-1/status", "connected\n");
        write(&sys, "class/drm/card0-eDP-1/modes", "1920x1200\n1280x800\n");
        write(
            &proc_root,
            "cpuinfo",
            "processor\t: 0\nBogoMIPS\t: 38.40\nFeatures\t: fp asimd aes pmull fp\n",
        );
        write(&sys, "bus/iio/devices/iio:device0/name", "accel_3d\n");
        write(&sys, "bus/iio/devices/iio:device0/in_accel_scale", "0.009806\n");
        write(&sys, "bus/iio/devices/iio:device1/name", "als\n");
        let probe = DeviceProbe::with_roots(sys, proc_root).with_uname(UnameInfo {
            sysname: "Linux".to_string(),
            nodename: "workstation".to_string(),
            release: "6.8.0".to_string(),
        });
        (dir, probe)
    }

    #[test]
    fn reads_profile_from_sysfs_tree() {
        let (_dir, probe) = fixture();
        let profile = probe.probe();
        assert_eq!(profile.name, "ThinkPad X13s");
        assert_eq!(profile.os, "Linux 6.8.0");
        assert_eq!(profile.cpu_speed_mhz, 2995.2);
        assert_eq!((profile.screen_width, profile.screen_height), (1920, 1200));
        assert_eq!(profile.features, vec!["aes", "asimd", "fp", "pmull"]);
        assert_eq!(profile.sensors.len(), 2);
        assert_eq!(profile.sensors[0].name, "accel_3d");
        assert_eq!(profile.sensors[0].resolution, 0.009806);
        assert_eq!(profile.sensors[1].resolution, 0.0);
        assert!(profile.cpu_cores >= 1);
    }

    #[test]
    fn missing_tree_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let probe = DeviceProbe::with_roots(dir.path().join("sys"), dir.path().join("proc"))
            .with_uname(UnameInfo {
                sysname: "Linux".to_string(),
                nodename: "buildbox".to_string(),
                release: "6.1".to_string(),
            });
        let profile = probe.probe();
        assert_eq!(profile.name, "buildbox");
        assert_eq!(profile.cpu_speed_mhz, 0.0);
        assert_eq!((profile.screen_width, profile.screen_height), (0, 0));
        assert!(profile.features.is_empty());
        assert!(profile.sensors.is_empty());
    }

    #[test]
    fn malformed_frequency_reads_as_zero() {
        let dir = TempDir::new().expect("tempdir");
        write(
            dir.path(),
            "devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq",
            "fast\n",
        );
        let probe = DeviceProbe::with_roots(dir.path(), dir.path());
        assert_eq!(probe.max_cpu_freq_mhz(), 0.0);
    }

    #[test]
    fn interlaced_modes_parse() {
        assert_eq!(parse_mode("1920x1080i"), Some((1920, 1080)));
        assert_eq!(parse_mode("garbage"), None);
    }
}
