use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{
    append_desktop_log, desktop_bridge, link_router, ABOUT_PAGE, ABOUT_WINDOW_HEIGHT,
    ABOUT_WINDOW_LABEL, ABOUT_WINDOW_WIDTH, MAIN_WINDOW_LABEL,
};

/// Opens the about window, or focuses it when one is already open. It is closed for real
/// when dismissed; metadata is pushed once its page finishes loading.
pub(crate) fn create_about_window(app_handle: &AppHandle) -> Result<(), String> {
    if let Some(existing) = app_handle.get_webview_window(ABOUT_WINDOW_LABEL) {
        existing
            .show()
            .and_then(|_| existing.set_focus())
            .map_err(|error| format!("Failed to focus about window: {error}"))?;
        return Ok(());
    }

    let mut builder = WebviewWindowBuilder::new(
        app_handle,
        ABOUT_WINDOW_LABEL,
        WebviewUrl::App(ABOUT_PAGE.into()),
    )
    .title("About")
    .inner_size(ABOUT_WINDOW_WIDTH, ABOUT_WINDOW_HEIGHT)
    .resizable(false)
    .minimizable(false)
    .center()
    .initialization_script(&desktop_bridge::bridge_script())
    .on_navigation(link_router::allow_in_app_navigation);

    match app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(main_window) => {
            builder = builder
                .parent(&main_window)
                .map_err(|error| format!("Failed to parent about window: {error}"))?;
        }
        None => append_desktop_log("about window opened without parent: main window not found"),
    }

    let window = builder
        .build()
        .map_err(|error| format!("Failed to create about window: {error}"))?;
    if let Err(error) = window.remove_menu() {
        append_desktop_log(&format!("failed to remove about window menu: {error}"));
    }
    Ok(())
}
