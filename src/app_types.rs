use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use tauri::menu::{CheckMenuItem, Menu, MenuItem};

use crate::{autostart, runtime_paths::AutostartPaths, zoom, TRAY_FLAG};

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) menu: Menu<tauri::Wry>,
    pub(crate) toggle_item: MenuItem<tauri::Wry>,
    pub(crate) autostart_item: CheckMenuItem<tauri::Wry>,
    pub(crate) about_item: MenuItem<tauri::Wry>,
    pub(crate) quit_item: MenuItem<tauri::Wry>,
}

/// What the shell window is currently told to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShellContent {
    Remote,
    Offline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LaunchOptions {
    pub(crate) start_hidden: bool,
}

impl LaunchOptions {
    pub(crate) fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            start_hidden: args.into_iter().any(|arg| arg.as_ref() == TRAY_FLAG),
        }
    }
}

/// Shell-wide mutable state. Only touched from event-loop handlers; the mutexes exist to
/// satisfy `Manager::manage`.
#[derive(Debug)]
pub(crate) struct ShellState {
    autostart: Mutex<bool>,
    content: Mutex<ShellContent>,
    zoom_level: Mutex<i32>,
    quitting: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(autostart_enabled: bool) -> Self {
        Self {
            autostart: Mutex::new(autostart_enabled),
            content: Mutex::new(ShellContent::Remote),
            zoom_level: Mutex::new(0),
            quitting: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_autostart_enabled(&self) -> bool {
        self.autostart.lock().map(|guard| *guard).unwrap_or(false)
    }

    /// Flips the autostart flag and reconciles the marker file with it.
    ///
    /// When reconciliation fails the flag is re-read from the marker, so the flag never
    /// disagrees with the filesystem.
    pub(crate) fn toggle_autostart(&self, paths: &AutostartPaths) -> Result<bool, String> {
        let mut guard = self
            .autostart
            .lock()
            .map_err(|_| "Autostart state lock poisoned.".to_string())?;
        let enabled = !*guard;
        match autostart::reconcile(paths, enabled) {
            Ok(()) => {
                *guard = enabled;
                Ok(enabled)
            }
            Err(error) => {
                *guard = autostart::is_enabled(paths);
                Err(error)
            }
        }
    }

    pub(crate) fn content(&self) -> ShellContent {
        self.content
            .lock()
            .map(|guard| *guard)
            .unwrap_or(ShellContent::Remote)
    }

    pub(crate) fn set_content(&self, content: ShellContent) {
        if let Ok(mut guard) = self.content.lock() {
            *guard = content;
        }
    }

    #[cfg(test)]
    pub(crate) fn zoom_level(&self) -> i32 {
        self.zoom_level.lock().map(|guard| *guard).unwrap_or(0)
    }

    pub(crate) fn apply_zoom(&self, gesture: zoom::ZoomGesture) -> i32 {
        match self.zoom_level.lock() {
            Ok(mut guard) => {
                *guard = zoom::next_zoom_level(*guard, gesture);
                *guard
            }
            Err(_) => 0,
        }
    }

    pub(crate) fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::zoom::ZoomGesture;

    fn autostart_fixture(root: &std::path::Path) -> AutostartPaths {
        let install_dir = root.join("install");
        fs::create_dir_all(&install_dir).expect("install dir");
        let paths = AutostartPaths::new(install_dir, root.join("data"));
        fs::write(&paths.template, "[Desktop Entry]\n").expect("template");
        paths
    }

    #[test]
    fn launch_options_detect_tray_flag() {
        assert!(LaunchOptions::from_args(["lumo-desktop", "--tray"]).start_hidden);
        assert!(!LaunchOptions::from_args(["lumo-desktop"]).start_hidden);
        assert!(!LaunchOptions::from_args(["lumo-desktop", "--tray=1"]).start_hidden);
    }

    #[test]
    fn toggle_autostart_keeps_flag_and_marker_in_sync() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = autostart_fixture(temp.path());
        let state = ShellState::new(autostart::is_enabled(&paths));

        assert_eq!(state.toggle_autostart(&paths), Ok(true));
        assert!(state.is_autostart_enabled());
        assert!(paths.marker.exists());

        assert_eq!(state.toggle_autostart(&paths), Ok(false));
        assert!(!state.is_autostart_enabled());
        assert!(!paths.marker.exists());
    }

    #[test]
    fn toggle_autostart_failure_falls_back_to_marker_truth() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = AutostartPaths::new(temp.path().join("no-install"), temp.path().join("data"));
        let state = ShellState::new(false);

        assert!(state.toggle_autostart(&paths).is_err());
        assert!(!state.is_autostart_enabled());
    }

    #[test]
    fn zoom_reset_returns_to_zero_from_any_level() {
        let state = ShellState::new(false);
        for _ in 0..3 {
            state.apply_zoom(ZoomGesture::In);
        }
        assert_eq!(state.zoom_level(), 3);
        assert_eq!(state.apply_zoom(ZoomGesture::Reset), 0);

        state.apply_zoom(ZoomGesture::Out);
        state.apply_zoom(ZoomGesture::Out);
        assert_eq!(state.apply_zoom(ZoomGesture::Reset), 0);
    }

    #[test]
    fn shell_state_starts_on_remote_content() {
        let state = ShellState::new(false);
        assert_eq!(state.content(), ShellContent::Remote);
        state.set_content(ShellContent::Offline);
        assert_eq!(state.content(), ShellContent::Offline);
        assert!(!state.is_quitting());
        state.mark_quitting();
        assert!(state.is_quitting());
    }
}
