use serde_json::Value;
use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, app_metadata, link_router, main_window, network_navigator,
    zoom::{self, ZoomGesture},
    ShellContent, ShellState, MAIN_WINDOW_LABEL,
};

/// The single command every renderer message travels through.
pub(crate) const IPC_COMMAND: &str = "shell_ipc_send";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShellChannel {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    LogMessage,
    OpenExternalLink,
    NetworkStatus,
    RetryConnection,
    GetAppMetadata,
    ReloadApp,
}

const CHANNEL_TABLE: [(&str, ShellChannel); 9] = [
    ("zoom-in", ShellChannel::ZoomIn),
    ("zoom-out", ShellChannel::ZoomOut),
    ("zoom-reset", ShellChannel::ZoomReset),
    ("log-message", ShellChannel::LogMessage),
    ("open-external-link", ShellChannel::OpenExternalLink),
    ("network-status", ShellChannel::NetworkStatus),
    ("retry-connection", ShellChannel::RetryConnection),
    ("get-app-metadata", ShellChannel::GetAppMetadata),
    ("reload-app", ShellChannel::ReloadApp),
];

impl ShellChannel {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        CHANNEL_TABLE
            .iter()
            .find(|(channel_name, _)| *channel_name == name)
            .map(|(_, channel)| *channel)
    }

    pub(crate) fn name(self) -> &'static str {
        CHANNEL_TABLE
            .iter()
            .find(|(_, channel)| *channel == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Channels that steer the shell window are honored only from the shell window.
    pub(crate) fn accepts_from(self, window_label: &str) -> bool {
        match self {
            Self::LogMessage | Self::OpenExternalLink | Self::GetAppMetadata => true,
            Self::ZoomIn
            | Self::ZoomOut
            | Self::ZoomReset
            | Self::NetworkStatus
            | Self::RetryConnection
            | Self::ReloadApp => window_label == MAIN_WINDOW_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellMessage {
    Zoom(ZoomGesture),
    LogMessage(String),
    OpenExternalLink(String),
    NetworkStatus(bool),
    RetryConnection,
    GetAppMetadata,
    ReloadApp,
}

fn expect_string(channel: ShellChannel, payload: Option<Value>) -> Result<String, String> {
    match payload {
        Some(Value::String(value)) => Ok(value),
        other => Err(format!(
            "Channel '{}' expects a string payload, got {}.",
            channel.name(),
            describe_payload(other.as_ref())
        )),
    }
}

fn expect_bool(channel: ShellChannel, payload: Option<Value>) -> Result<bool, String> {
    match payload {
        Some(Value::Bool(value)) => Ok(value),
        other => Err(format!(
            "Channel '{}' expects a boolean payload, got {}.",
            channel.name(),
            describe_payload(other.as_ref())
        )),
    }
}

fn describe_payload(payload: Option<&Value>) -> &'static str {
    match payload {
        None | Some(Value::Null) => "nothing",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

pub(crate) fn parse_message(channel_name: &str, payload: Option<Value>) -> Result<ShellMessage, String> {
    let channel = ShellChannel::from_name(channel_name)
        .ok_or_else(|| format!("Unknown channel '{channel_name}'."))?;

    let message = match channel {
        ShellChannel::ZoomIn => ShellMessage::Zoom(ZoomGesture::In),
        ShellChannel::ZoomOut => ShellMessage::Zoom(ZoomGesture::Out),
        ShellChannel::ZoomReset => ShellMessage::Zoom(ZoomGesture::Reset),
        ShellChannel::LogMessage => ShellMessage::LogMessage(match payload {
            Some(Value::String(value)) => value,
            Some(other) => other.to_string(),
            None => String::new(),
        }),
        ShellChannel::OpenExternalLink => {
            ShellMessage::OpenExternalLink(expect_string(channel, payload)?)
        }
        ShellChannel::NetworkStatus => ShellMessage::NetworkStatus(expect_bool(channel, payload)?),
        ShellChannel::RetryConnection => ShellMessage::RetryConnection,
        ShellChannel::GetAppMetadata => ShellMessage::GetAppMetadata,
        ShellChannel::ReloadApp => ShellMessage::ReloadApp,
    };
    Ok(message)
}

pub(crate) fn dispatch(app_handle: &AppHandle, source_label: &str, message: ShellMessage) {
    match message {
        ShellMessage::Zoom(gesture) => zoom::apply_zoom_gesture(app_handle, gesture),
        ShellMessage::LogMessage(text) => {
            append_desktop_log(&format!("log from {source_label}: {text}"));
        }
        ShellMessage::OpenExternalLink(url) => {
            append_desktop_log(&format!(
                "open-external-link ({:?} host): {url}",
                link_router::route_for_url(&url)
            ));
            if !url.trim().is_empty() {
                link_router::open_external(&url);
            }
        }
        ShellMessage::NetworkStatus(is_online) => {
            network_navigator::apply_network_status(app_handle, is_online)
        }
        ShellMessage::RetryConnection => {
            // No remediation is defined for retry; the offline page stays until the
            // renderer reports connectivity again.
            append_desktop_log("retry-connection received; waiting for an online event");
        }
        ShellMessage::GetAppMetadata => {
            app_metadata::send_app_metadata(app_handle, source_label);
        }
        ShellMessage::ReloadApp => {
            append_desktop_log("reload requested from keyboard shortcut");
            let Some(state) = app_handle.try_state::<ShellState>() else {
                append_desktop_log("reload skipped: shell state unavailable");
                return;
            };
            match network_navigator::select_content(&state, ShellContent::Remote) {
                Ok(url) => main_window::navigate_main_window(app_handle, url, append_desktop_log),
                Err(error) => append_desktop_log(&format!("reload skipped: {error}")),
            }
        }
    }
}

#[tauri::command]
pub(crate) fn shell_ipc_send(
    app_handle: AppHandle,
    webview_window: tauri::WebviewWindow,
    channel: String,
    payload: Option<Value>,
) -> Result<(), String> {
    let source_label = webview_window.label().to_string();
    let message = parse_message(&channel, payload).map_err(|error| {
        append_desktop_log(&format!("rejected message from {source_label}: {error}"));
        error
    })?;

    let accepted = ShellChannel::from_name(&channel)
        .map(|channel| channel.accepts_from(&source_label))
        .unwrap_or(false);
    if !accepted {
        let reason = format!("Channel '{channel}' is not accepted from window '{source_label}'.");
        append_desktop_log(&reason);
        return Err(reason);
    }

    dispatch(&app_handle, &source_label, message);
    Ok(())
}
