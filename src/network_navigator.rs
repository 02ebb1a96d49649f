use tauri::{AppHandle, Manager};
use url::Url;

use crate::{append_desktop_log, main_window, ShellContent, ShellState, APP_URL, OFFLINE_PAGE};

pub(crate) fn content_for_status(is_online: bool) -> ShellContent {
    if is_online {
        ShellContent::Remote
    } else {
        ShellContent::Offline
    }
}

pub(crate) fn url_for_content(content: ShellContent) -> Result<Url, String> {
    match content {
        ShellContent::Remote => {
            Url::parse(APP_URL).map_err(|error| format!("Invalid app URL {APP_URL}: {error}"))
        }
        ShellContent::Offline => main_window::shell_asset_url(OFFLINE_PAGE),
    }
}

/// Records `content` as the active content and returns the address to load for it.
pub(crate) fn select_content(state: &ShellState, content: ShellContent) -> Result<Url, String> {
    let url = url_for_content(content)?;
    state.set_content(content);
    Ok(url)
}

/// Level-triggered: every report selects the content matching the reported state, even
/// when it is already displayed.
pub(crate) fn transition(state: &ShellState, is_online: bool) -> Result<Url, String> {
    select_content(state, content_for_status(is_online))
}

pub(crate) fn apply_network_status(app_handle: &AppHandle, is_online: bool) {
    append_desktop_log(&format!(
        "network status: {}",
        if is_online { "online" } else { "offline" }
    ));
    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_desktop_log("network navigation skipped: shell state unavailable");
        return;
    };

    let previous = state.content();
    match transition(&state, is_online) {
        Ok(url) => {
            append_desktop_log(&format!(
                "shell content {previous:?} -> {:?}",
                state.content()
            ));
            main_window::navigate_main_window(app_handle, url, append_desktop_log);
        }
        Err(error) => append_desktop_log(&format!("network navigation skipped: {error}")),
    }
}
