use std::time::Duration;

pub(crate) const APP_URL: &str = "https://lumo.proton.me";
pub(crate) const APP_TITLE: &str = "Proton Lumo.ai";
pub(crate) const ALLOWED_HOSTS: [&str; 2] = ["lumo.proton.me", "account.proton.me"];

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const ABOUT_WINDOW_LABEL: &str = "about";
pub(crate) const CAPTURE_WINDOW_LABEL: &str = "capture";
pub(crate) const TRAY_ID: &str = "lumo-tray";
pub(crate) const TRAY_FLAG: &str = "--tray";

pub(crate) const OFFLINE_PAGE: &str = "offline.html";
pub(crate) const ABOUT_PAGE: &str = "about.html";
pub(crate) const SIDEBAR_BUTTON_ELEMENT_ID: &str = "aichat-side-menu-button";

pub(crate) const MAIN_WINDOW_WIDTH_FRACTION: f64 = 0.6;
pub(crate) const MAIN_WINDOW_HEIGHT_FRACTION: f64 = 0.8;
pub(crate) const ABOUT_WINDOW_WIDTH: f64 = 500.0;
pub(crate) const ABOUT_WINDOW_HEIGHT: f64 = 300.0;

pub(crate) const MIN_ZOOM_LEVEL: i32 = -8;
pub(crate) const MAX_ZOOM_LEVEL: i32 = 9;
pub(crate) const ZOOM_STEP_FACTOR: f64 = 1.2;

pub(crate) const INSTALL_PATH_ENV: &str = "SNAP";
pub(crate) const USER_DATA_PATH_ENV: &str = "SNAP_USER_DATA";
pub(crate) const AUTOSTART_MARKER_NAME: &str = "proton-lumo.ai.desktop";
pub(crate) const AUTOSTART_TEMPLATE_NAME: &str = "com.github.kenvandine.lumo.ai-autostart.desktop";
pub(crate) const APP_MANIFEST_NAME: &str = "app-manifest.json";

pub(crate) const SCREENSHOT_PATH_ENV: &str = "SCREENSHOT_PATH";
pub(crate) const DEFAULT_SCREENSHOT_PATH: &str = "screenshot.png";
pub(crate) const CAPTURE_VIEWPORT_WIDTH: f64 = 1920.0;
pub(crate) const CAPTURE_VIEWPORT_HEIGHT: f64 = 1080.0;
pub(crate) const CAPTURE_SETTLE_DELAY: Duration = Duration::from_secs(5);
pub(crate) const CAPTURE_FAILURE_DELAY: Duration = Duration::from_secs(2);
pub(crate) const CAPTURE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const CAPTURE_REACHABILITY_TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) const DESKTOP_LOG_DIR: &str = ".lumo-desktop";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;
