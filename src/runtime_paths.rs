use std::{env, path::PathBuf};

use crate::{
    APP_MANIFEST_NAME, AUTOSTART_MARKER_NAME, AUTOSTART_TEMPLATE_NAME, DESKTOP_LOG_DIR,
    INSTALL_PATH_ENV, USER_DATA_PATH_ENV,
};

fn non_empty_path(raw: Option<String>) -> Option<PathBuf> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn current_exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
}

pub(crate) fn resolve_install_dir(
    env_value: Option<String>,
    fallback: Option<PathBuf>,
) -> Option<PathBuf> {
    non_empty_path(env_value).or(fallback)
}

pub(crate) fn resolve_user_data_dir(
    env_value: Option<String>,
    fallback: Option<PathBuf>,
) -> Option<PathBuf> {
    non_empty_path(env_value).or(fallback)
}

/// Base installation path (`$SNAP`, or the executable's directory).
pub(crate) fn default_install_dir() -> Option<PathBuf> {
    resolve_install_dir(env::var(INSTALL_PATH_ENV).ok(), current_exe_dir())
}

/// Per-user data path (`$SNAP_USER_DATA`, or the home directory).
pub(crate) fn default_user_data_dir() -> Option<PathBuf> {
    resolve_user_data_dir(env::var(USER_DATA_PATH_ENV).ok(), home::home_dir())
}

pub(crate) fn default_log_dir() -> Option<PathBuf> {
    default_user_data_dir().map(|root| root.join(DESKTOP_LOG_DIR).join("logs"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AutostartPaths {
    pub(crate) template: PathBuf,
    pub(crate) marker: PathBuf,
}

impl AutostartPaths {
    pub(crate) fn new(install_dir: PathBuf, user_data_dir: PathBuf) -> Self {
        Self {
            template: install_dir.join(AUTOSTART_TEMPLATE_NAME),
            marker: user_data_dir
                .join(".config")
                .join("autostart")
                .join(AUTOSTART_MARKER_NAME),
        }
    }

    pub(crate) fn resolve() -> Result<Self, String> {
        let install_dir = default_install_dir()
            .ok_or_else(|| format!("Cannot resolve install path (set {INSTALL_PATH_ENV})."))?;
        let user_data_dir = default_user_data_dir()
            .ok_or_else(|| format!("Cannot resolve user data path (set {USER_DATA_PATH_ENV})."))?;
        Ok(Self::new(install_dir, user_data_dir))
    }
}

/// Manifest candidates in lookup order: the bundled resource directory first, then the
/// install path.
pub(crate) fn app_manifest_candidates(resource_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = resource_dir {
        candidates.push(dir.join(APP_MANIFEST_NAME));
    }
    if let Some(dir) = default_install_dir() {
        let candidate = dir.join(APP_MANIFEST_NAME);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}
