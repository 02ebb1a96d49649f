use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    append_desktop_log, append_startup_log, desktop_bridge, link_router, tray_labels,
    LaunchOptions, APP_TITLE, APP_URL, MAIN_WINDOW_HEIGHT_FRACTION, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_WIDTH_FRACTION,
};

const FALLBACK_WINDOW_WIDTH: f64 = 1280.0;
const FALLBACK_WINDOW_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowGeometry {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// A window covering the given fractions of the area, centered inside it.
pub(crate) fn centered_geometry(
    area_x: f64,
    area_y: f64,
    area_width: f64,
    area_height: f64,
    width_fraction: f64,
    height_fraction: f64,
) -> WindowGeometry {
    let width = area_width * width_fraction;
    let height = area_height * height_fraction;
    WindowGeometry {
        x: area_x + (area_width - width) / 2.0,
        y: area_y + (area_height - height) / 2.0,
        width,
        height,
    }
}

/// Address of a page bundled with the shell, on the platform's asset origin.
pub(crate) fn shell_asset_url(page: &str) -> Result<Url, String> {
    let origin = if cfg!(target_os = "windows") {
        "http://tauri.localhost/"
    } else {
        "tauri://localhost/"
    };
    Url::parse(origin)
        .and_then(|base| base.join(page))
        .map_err(|error| format!("Invalid shell asset path {page}: {error}"))
}

fn primary_work_area_geometry(app_handle: &AppHandle) -> Option<WindowGeometry> {
    let monitor = match app_handle.primary_monitor() {
        Ok(Some(monitor)) => monitor,
        Ok(None) => {
            append_startup_log("primary display not reported; using fallback window size");
            return None;
        }
        Err(error) => {
            append_startup_log(&format!("failed to query primary display: {error}"));
            return None;
        }
    };

    let scale_factor = monitor.scale_factor();
    let work_area = monitor.work_area();
    let position = work_area.position.to_logical::<f64>(scale_factor);
    let size = work_area.size.to_logical::<f64>(scale_factor);
    append_startup_log(&format!(
        "primary work area: width={} height={} x={} y={} scale={}",
        size.width, size.height, position.x, position.y, scale_factor
    ));

    Some(centered_geometry(
        position.x,
        position.y,
        size.width,
        size.height,
        MAIN_WINDOW_WIDTH_FRACTION,
        MAIN_WINDOW_HEIGHT_FRACTION,
    ))
}

/// Builds the one shell window. Tray-only launches start hidden.
pub(crate) fn create_shell_window(
    app_handle: &AppHandle,
    options: LaunchOptions,
) -> Result<WebviewWindow, String> {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(window);
    }

    let app_url =
        Url::parse(APP_URL).map_err(|error| format!("Invalid app URL {APP_URL}: {error}"))?;
    let builder =
        WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(app_url))
            .title(APP_TITLE)
            .visible(!options.start_hidden)
            .initialization_script(&desktop_bridge::bridge_script())
            .on_navigation(link_router::allow_in_app_navigation);

    let builder = match primary_work_area_geometry(app_handle) {
        Some(geometry) => builder
            .inner_size(geometry.width, geometry.height)
            .position(geometry.x, geometry.y),
        None => builder
            .inner_size(FALLBACK_WINDOW_WIDTH, FALLBACK_WINDOW_HEIGHT)
            .center(),
    };

    let window = builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))?;
    if let Err(error) = window.remove_menu() {
        append_startup_log(&format!("failed to remove main window menu: {error}"));
    }
    append_startup_log(&format!(
        "main window created ({})",
        if options.start_hidden { "hidden" } else { "visible" }
    ));
    Ok(window)
}

/// Runs after every finished load in the shell window. Only hosted pages are adjusted;
/// failures are ignored because the hosted markup is not ours.
pub(crate) fn handle_main_page_loaded(webview: &tauri::Webview<tauri::Wry>, url: &Url) {
    if link_router::route_for_parsed_url(url) != link_router::LinkRoute::InApp {
        return;
    }
    if let Err(error) = webview.eval(&desktop_bridge::page_adjustment_script()) {
        append_desktop_log(&format!("page adjustment skipped for {url}: {error}"));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisibilityChange {
    Show,
    Hide,
}

/// A minimized window counts as hidden, so the toggle brings it back instead of hiding it.
pub(crate) fn toggle_change(is_visible: bool, is_minimized: bool) -> VisibilityChange {
    if is_visible && !is_minimized {
        VisibilityChange::Hide
    } else {
        VisibilityChange::Show
    }
}

fn reveal_window<F>(window: &WebviewWindow, log: &F)
where
    F: Fn(&str),
{
    if let Ok(true) = window.is_minimized() {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to unminimize main window: {error}"));
        }
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

/// Shows and focuses the shell window, then redraws the tray label.
pub(crate) fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };
    reveal_window(&window, &log);
    tray_labels::render_tray_from_state(app_handle, Some(true), log);
}

pub(crate) fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("hide_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
    tray_labels::render_tray_from_state(app_handle, Some(false), log);
}

/// Show/Hide toggle. Only logs until the shell window exists.
pub(crate) fn toggle_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("toggle_main_window skipped: main window not found");
        return;
    };

    let is_visible = match window.is_visible() {
        Ok(is_visible) => is_visible,
        Err(error) => {
            log(&format!("failed to read main window visibility: {error}"));
            return;
        }
    };
    let is_minimized = window.is_minimized().unwrap_or(false);
    match toggle_change(is_visible, is_minimized) {
        VisibilityChange::Show => show_main_window(app_handle, log),
        VisibilityChange::Hide => hide_main_window(app_handle, log),
    }
}

/// Replaces the shell window's content. A newer load simply supersedes an older one.
pub(crate) fn navigate_main_window<F>(app_handle: &AppHandle, url: Url, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("navigate_main_window skipped: main window not found");
        return;
    };

    log(&format!("loading {url} in main window"));
    if let Err(error) = window.navigate(url.clone()) {
        log(&format!("failed to load {url} in main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_geometry_uses_fractions_of_work_area() {
        let geometry = centered_geometry(0.0, 0.0, 1920.0, 1080.0, 0.6, 0.8);
        assert_eq!(
            geometry,
            WindowGeometry {
                x: 384.0,
                y: 108.0,
                width: 1152.0,
                height: 864.0,
            }
        );
    }

    #[test]
    fn centered_geometry_respects_work_area_offset() {
        let geometry = centered_geometry(1920.0, 32.0, 2560.0, 1400.0, 0.6, 0.8);
        assert_eq!(geometry.width, 1536.0);
        assert_eq!(geometry.height, 1120.0);
        assert_eq!(geometry.x, 1920.0 + 512.0);
        assert_eq!(geometry.y, 32.0 + 140.0);
    }

    #[test]
    fn toggle_hides_only_a_window_on_screen() {
        assert_eq!(toggle_change(true, false), VisibilityChange::Hide);
        assert_eq!(toggle_change(false, false), VisibilityChange::Show);
        assert_eq!(toggle_change(true, true), VisibilityChange::Show);
        assert_eq!(toggle_change(false, true), VisibilityChange::Show);
    }

    #[test]
    fn shell_asset_url_targets_asset_origin() {
        let url = shell_asset_url("offline.html").expect("asset url");
        if cfg!(target_os = "windows") {
            assert_eq!(url.as_str(), "http://tauri.localhost/offline.html");
        } else {
            assert_eq!(url.as_str(), "tauri://localhost/offline.html");
        }
    }
}
