//! Runtime configuration shared across binaries.
//!
//! Centralizes environment lookup, PATH resolution, and the browser launcher
//! so every CLI reads the same knobs the same way. Command-line flags are
//! applied on top of a [`Config`] by each binary.

use crate::native::LibraryPaths;
use crate::service::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result, bail};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "GLESCAPS_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "GLESCAPS_TIMEOUT_SECS";
pub const ENV_LOG: &str = "GLESCAPS_LOG";
pub const ENV_EGL_LIBRARY: &str = "GLESCAPS_EGL_LIBRARY";
pub const ENV_GLES_LIBRARY: &str = "GLESCAPS_GLES_LIBRARY";

const DEFAULT_LOG_FILTER: &str = "warn";
const BROWSER_LAUNCHERS: &[&str] = &["xdg-open", "open"];

/// Returns the value of `key` when it is set to something other than blanks.
pub fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Install the `env_logger` backend, filtered by `GLESCAPS_LOG`.
pub fn init_logging() {
    let env = env_logger::Env::default().filter_or(ENV_LOG, DEFAULT_LOG_FILTER);
    // A second init (tests driving several entry points) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub library_paths: LibraryPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            library_paths: LibraryPaths::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_non_empty)
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout_secs(&raw).with_context(|| format!("invalid {ENV_TIMEOUT_SECS}"))?;
        }
        config.library_paths = LibraryPaths {
            egl: lookup(ENV_EGL_LIBRARY).map(PathBuf::from),
            gles: lookup(ENV_GLES_LIBRARY).map(PathBuf::from),
        };
        Ok(config)
    }
}

/// Parse a whole number of seconds; zero is rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("expected a number of seconds, got '{raw}'"))?;
    if secs == 0 {
        bail!("timeout must be at least one second");
    }
    Ok(Duration::from_secs(secs))
}

/// Returns true when a file exists and has any execute bit set.
pub fn helper_is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find an executable by name somewhere on PATH.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    find_in_dirs(env::split_paths(&paths), name)
}

fn find_in_dirs<I>(dirs: I, name: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| helper_is_executable(candidate))
}

/// First available URL launcher on PATH.
pub fn browser_launcher() -> Option<PathBuf> {
    BROWSER_LAUNCHERS.iter().find_map(|name| find_on_path(name))
}

/// Hand `url` to the desktop's browser launcher without waiting on it.
pub fn open_in_browser(url: &str) -> Result<()> {
    let Some(launcher) = browser_launcher() else {
        bail!("no browser launcher found on PATH (tried {})", BROWSER_LAUNCHERS.join(", "));
    };
    Command::new(&launcher)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {}", launcher.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "https://opengles.gpuinfo.org");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://127.0.0.1:8080/"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_EGL_LIBRARY, "/opt/mesa/libEGL.so.1"),
            (ENV_GLES_LIBRARY, "  "),
        ]))
        .expect("config");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.library_paths.egl.as_deref(),
            Some(Path::new("/opt/mesa/libEGL.so.1"))
        );
        assert_eq!(config.library_paths.gles, None);
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
        assert!(parse_timeout_secs("0").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn path_search_skips_non_executables() {
        use std::os::unix::fs::PermissionsExt;
        let first = TempDir::new().expect("tempdir");
        let second = TempDir::new().expect("tempdir");
        let plain = first.path().join("xdg-open");
        fs::write(&plain, "#!/bin/sh\n").expect("write");
        let runnable = second.path().join("xdg-open");
        fs::write(&runnable, "#!/bin/sh\n").expect("write");
        fs::set_permissions(&runnable, fs::Permissions::from_mode(0o755)).expect("chmod");

        let found = find_in_dirs(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            "xdg-open",
        );
        assert_eq!(found, Some(runnable));
    }
}
