use tauri::{AppHandle, Manager};

use crate::{
    about_window, append_desktop_log, append_shutdown_log, main_window,
    runtime_paths::AutostartPaths, tray_actions, tray_labels, ShellState,
};

fn toggle_autostart(app_handle: &AppHandle) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_desktop_log("autostart toggle ignored: shell state unavailable");
        return;
    };

    match AutostartPaths::resolve().and_then(|paths| state.toggle_autostart(&paths)) {
        Ok(enabled) => append_desktop_log(&format!(
            "tray toggled autostart: {}",
            if enabled { "enabled" } else { "disabled" }
        )),
        Err(error) => append_desktop_log(&format!("failed to update autostart: {error}")),
    }

    tray_labels::render_tray_from_state(app_handle, None, append_desktop_log);
}

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    if app_handle
        .try_state::<ShellState>()
        .is_some_and(|state| state.is_quitting())
    {
        append_shutdown_log(&format!("tray menu event {menu_id} ignored during shutdown"));
        return;
    }

    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            main_window::toggle_main_window(app_handle, append_desktop_log)
        }
        Some(tray_actions::TrayMenuAction::ToggleAutostart) => toggle_autostart(app_handle),
        Some(tray_actions::TrayMenuAction::About) => {
            append_desktop_log("tray about requested");
            if let Err(error) = about_window::create_about_window(app_handle) {
                append_desktop_log(&format!("failed to open about window: {error}"));
            }
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            if let Some(state) = app_handle.try_state::<ShellState>() {
                state.mark_quitting();
            }
            append_shutdown_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => append_desktop_log(&format!("ignored unknown tray menu id: {menu_id}")),
    }
}
