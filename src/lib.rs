mod about_window;
mod app_constants;
mod app_metadata;
mod app_runtime;
mod app_types;
mod autostart;
mod capture_runtime;
mod capture_timer;
mod desktop_bridge;
mod ipc_dispatch;
mod link_router;
mod logging;
mod main_window;
mod network_navigator;
mod runtime_paths;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod zoom;

use std::sync::{Mutex, OnceLock};

pub(crate) use app_constants::*;
pub(crate) use app_types::{LaunchOptions, ShellContent, ShellState, TrayMenuState};

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Entry point of the interactive shell.
pub fn run() {
    app_runtime::run();
}

/// Entry point of the standalone capture mode.
pub fn run_capture() {
    capture_runtime::run();
}

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Startup, message);
}

pub(crate) fn append_capture_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Capture, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: logging::DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        runtime_paths::default_log_dir(),
        DESKTOP_LOG_FILE,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    )
}
