use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, append_startup_log, main_window, tray_actions, tray_labels,
    tray_menu_handler, ShellState, TrayMenuState, MAIN_WINDOW_LABEL, TRAY_ID,
};

/// Builds the tray after the main window and the autostart flag exist, so no tray action
/// can target a missing window or an uninitialized flag.
pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let main_window_visible = app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .and_then(|window| window.is_visible().ok())
        .unwrap_or(false);
    let autostart_enabled = app_handle
        .try_state::<ShellState>()
        .map(|state| state.is_autostart_enabled())
        .unwrap_or(false);

    let toggle_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        tray_labels::toggle_label(main_window_visible),
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray toggle menu item: {error}"))?;
    let autostart_item = CheckMenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_AUTOSTART,
        tray_labels::TRAY_AUTOSTART_LABEL,
        true,
        autostart_enabled,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray autostart menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;
    let about_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_ABOUT,
        tray_labels::TRAY_ABOUT_LABEL,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray about menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        tray_labels::TRAY_QUIT_LABEL,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[
            &toggle_item,
            &autostart_item,
            &separator,
            &about_item,
            &quit_item,
        ],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        menu: menu.clone(),
        toggle_item: toggle_item.clone(),
        autostart_item: autostart_item.clone(),
        about_item: about_item.clone(),
        quit_item: quit_item.clone(),
    }) {
        append_startup_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(tray_labels::TRAY_TOOLTIP)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            // Double clicks arrive as their own event and are ignored.
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                append_desktop_log("tray icon clicked");
                main_window::toggle_main_window(tray.app_handle(), append_desktop_log);
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    tray_labels::render_tray_from_state(app_handle, None, append_desktop_log);
    Ok(())
}
