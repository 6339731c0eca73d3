//! Configuration Vault – reads/writes `~/.graspframe/config.toml`.

use graspframe_types::{GraspError, Pose};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user configuration stored in `~/.graspframe/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Decimals printed in human-readable output.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// TCP pose reported by the controller with the tool sitting on the
    /// object origin.  Every object-local pose is resolved against it.
    #[serde(default)]
    pub tcp_reference: Pose,
}

fn default_precision() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            tcp_reference: Pose::default(),
        }
    }
}

/// Return the config path: `$GRASPFRAME_CONFIG` when set, otherwise
/// `~/.graspframe/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("GRASPFRAME_CONFIG") {
        return PathBuf::from(p);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".graspframe").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, GraspError> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load the config from a specific path, without env overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, GraspError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        GraspError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| GraspError::Config(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(cfg))
}

/// Apply `GRASPFRAME_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `GRASPFRAME_PRECISION` | `precision` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides_with(cfg, |key| std::env::var(key).ok());
}

/// Same as [`apply_env_overrides`] with an injectable variable source.
pub(crate) fn apply_overrides_with(cfg: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("GRASPFRAME_PRECISION") {
        match v.trim().parse::<usize>() {
            Ok(p) => cfg.precision = p,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid GRASPFRAME_PRECISION"),
        }
    }
}

/// Save the config to disk, creating `~/.graspframe/` if necessary.
pub fn save(cfg: &Config) -> Result<(), GraspError> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), GraspError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| GraspError::Config(format!("failed to create config directory: {e}")))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                GraspError::Config(format!("failed to set config directory permissions: {e}"))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| GraspError::Serialization(format!("failed to serialize config: {e}")))?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(|e| GraspError::Config(format!("failed to write {}: {e}", path.display())))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| GraspError::Config(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp() -> Pose {
        Pose::from_array([609.90, 4.51, 103.94, 2.1361, 2.3107, 0.0546])
    }

    #[test]
    fn config_path_points_to_graspframe_dir() {
        let p = config_path_for_home("/home/operator");
        assert_eq!(p, PathBuf::from("/home/operator/.graspframe/config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn roundtrip_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config {
            precision: 5,
            tcp_reference: tcp(),
        };
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "precision = 2\n").expect("write");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.precision, 2);
        assert_eq!(loaded.tcp_reference, Pose::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "precision = \"many\"\n").expect("write");

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, GraspError::Config(_)), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).expect("file metadata").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);

        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .expect("dir metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn precision_override_applies() {
        let mut cfg = Config::default();
        apply_overrides_with(&mut cfg, |k| (k == "GRASPFRAME_PRECISION").then(|| "6".to_string()));
        assert_eq!(cfg.precision, 6);
    }

    #[test]
    fn invalid_precision_override_is_ignored() {
        let mut cfg = Config::default();
        apply_overrides_with(&mut cfg, |_| Some("lots".to_string()));
        assert_eq!(cfg.precision, 3);
    }

    #[test]
    fn no_overrides_leave_config_untouched() {
        let mut cfg = Config {
            precision: 4,
            tcp_reference: tcp(),
        };
        let before = cfg.clone();
        apply_overrides_with(&mut cfg, |_| None);
        assert_eq!(cfg, before);
    }
}
