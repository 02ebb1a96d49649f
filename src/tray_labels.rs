use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{tray_actions, ShellState, TrayMenuState, MAIN_WINDOW_LABEL, TRAY_ID};

pub(crate) const TRAY_TOOLTIP: &str = "Proton Lumo.ai";
pub(crate) const TRAY_SHOW_LABEL: &str = "Show Proton Lumo.ai";
pub(crate) const TRAY_HIDE_LABEL: &str = "Hide Proton Lumo.ai";
pub(crate) const TRAY_AUTOSTART_LABEL: &str = "Autostart";
pub(crate) const TRAY_ABOUT_LABEL: &str = "About";
pub(crate) const TRAY_QUIT_LABEL: &str = "Quit";

pub(crate) fn toggle_label(main_window_visible: bool) -> &'static str {
    if main_window_visible {
        TRAY_HIDE_LABEL
    } else {
        TRAY_SHOW_LABEL
    }
}

fn set_menu_text_safe<F>(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = item.set_text(text) {
        log(&format!(
            "failed to update tray menu text for {}: {}",
            item_name, error
        ));
    }
}

/// Redraws the tray menu from `ShellState` and hands it to the tray again; menus are not
/// refreshed on their own after a click.
pub fn render_tray_from_state<F>(app_handle: &AppHandle, visible_override: Option<bool>, log: F)
where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let effective_visible = if let Some(visible) = visible_override {
        visible
    } else {
        app_handle
            .get_webview_window(MAIN_WINDOW_LABEL)
            .and_then(|window| window.is_visible().ok())
            .unwrap_or(false)
    };
    let autostart_enabled = app_handle
        .try_state::<ShellState>()
        .map(|state| state.is_autostart_enabled())
        .unwrap_or(false);

    set_menu_text_safe(
        &tray_state.toggle_item,
        toggle_label(effective_visible),
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        &log,
    );
    set_menu_text_safe(
        &tray_state.about_item,
        TRAY_ABOUT_LABEL,
        tray_actions::TRAY_MENU_ABOUT,
        &log,
    );
    set_menu_text_safe(
        &tray_state.quit_item,
        TRAY_QUIT_LABEL,
        tray_actions::TRAY_MENU_QUIT,
        &log,
    );
    if let Err(error) = tray_state.autostart_item.set_checked(autostart_enabled) {
        log(&format!(
            "failed to update tray menu check state for {}: {}",
            tray_actions::TRAY_MENU_TOGGLE_AUTOSTART,
            error
        ));
    }

    let Some(tray) = app_handle.tray_by_id(TRAY_ID) else {
        log("tray re-render skipped: tray icon not found");
        return;
    };
    if let Err(error) = tray.set_menu(Some(tray_state.menu.clone())) {
        log(&format!("failed to re-apply tray menu: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_reflects_visibility() {
        assert_eq!(toggle_label(true), "Hide Proton Lumo.ai");
        assert_eq!(toggle_label(false), "Show Proton Lumo.ai");
    }
}
