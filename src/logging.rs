use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use chrono::{Local, SecondsFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Capture,
    Shutdown,
}

impl DesktopLogCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Capture => "capture",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(log_dir: Option<PathBuf>, log_file_name: &str) -> PathBuf {
    match log_dir {
        Some(dir) => dir.join(log_file_name),
        None => std::env::temp_dir().join(log_file_name),
    }
}

pub(crate) fn format_log_line(category: DesktopLogCategory, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
        category.as_str(),
        message
    )
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(format!(".{index}"));
    PathBuf::from(raw)
}

/// Shifts `desktop.log` -> `desktop.log.1` -> ... once the file reaches `max_bytes`.
/// The oldest backup beyond `backup_count` is dropped.
pub(crate) fn rotate_log_if_needed(
    path: &Path,
    max_bytes: u64,
    backup_count: usize,
) -> Result<(), String> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(format!(
                "Failed to stat desktop log {}: {}",
                path.display(),
                error
            ))
        }
    };
    if max_bytes == 0 || size < max_bytes {
        return Ok(());
    }

    if backup_count == 0 {
        return fs::remove_file(path).map_err(|error| {
            format!(
                "Failed to truncate desktop log {}: {}",
                path.display(),
                error
            )
        });
    }

    let oldest = backup_path(path, backup_count);
    if oldest.exists() {
        fs::remove_file(&oldest).map_err(|error| {
            format!(
                "Failed to remove old desktop log {}: {}",
                oldest.display(),
                error
            )
        })?;
    }
    for index in (1..backup_count).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            let to = backup_path(path, index + 1);
            fs::rename(&from, &to).map_err(|error| {
                format!(
                    "Failed to rotate desktop log {} -> {}: {}",
                    from.display(),
                    to.display(),
                    error
                )
            })?;
        }
    }
    let first = backup_path(path, 1);
    fs::rename(path, &first).map_err(|error| {
        format!(
            "Failed to rotate desktop log {} -> {}: {}",
            path.display(),
            first.display(),
            error
        )
    })
}

fn write_log_line(path: &Path, line: &str, max_bytes: u64, backup_count: usize) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create desktop log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    rotate_log_if_needed(path, max_bytes, backup_count)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open desktop log {}: {}", path.display(), error))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("Failed to write desktop log {}: {}", path.display(), error))
}

pub(crate) fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    log_dir: Option<PathBuf>,
    log_file_name: &str,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(category, message);
    eprint!("{line}");

    let path = resolve_desktop_log_path(log_dir, log_file_name);
    let lock = write_lock.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Err(error) = write_log_line(&path, &line, max_bytes, backup_count) {
        eprintln!("desktop log write failed: {error}");
    }
}
