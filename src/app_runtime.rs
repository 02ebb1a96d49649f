use std::env;

use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    app_metadata, append_desktop_log, append_shutdown_log, append_startup_log, autostart,
    main_window, runtime_paths::{self, AutostartPaths}, tray_setup, LaunchOptions,
    ShellState, ABOUT_WINDOW_LABEL, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

fn initial_autostart_flag() -> bool {
    match AutostartPaths::resolve() {
        Ok(paths) => {
            let enabled = autostart::is_enabled(&paths);
            append_startup_log(&format!(
                "autostart marker {} {}",
                paths.marker.display(),
                if enabled { "exists" } else { "does not exist" }
            ));
            enabled
        }
        Err(error) => {
            append_startup_log(&format!("autostart disabled: {error}"));
            false
        }
    }
}

pub(crate) fn run() {
    let launch_options = LaunchOptions::from_args(env::args());

    // The single-instance plugin goes first: a losing process exits inside it, before any
    // setup code runs.
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
            append_desktop_log(&format!("second instance launch intercepted: {argv:?}"));
            main_window::show_main_window(app, append_desktop_log);
        }))
        .invoke_handler(tauri::generate_handler![
            crate::ipc_dispatch::shell_ipc_send,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::CloseRequested { api, .. } = event {
                let app_handle = window.app_handle();
                let quitting = app_handle
                    .try_state::<ShellState>()
                    .is_some_and(|state| state.is_quitting());
                if quitting {
                    return;
                }

                api.prevent_close();
                main_window::hide_main_window(app_handle, append_desktop_log);
            }
        })
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!(
                    "page-load started in {}: {}",
                    webview.label(),
                    payload.url()
                ));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!(
                    "page-load finished in {}: {}",
                    webview.label(),
                    payload.url()
                ));
                match webview.label() {
                    MAIN_WINDOW_LABEL => main_window::handle_main_page_loaded(webview, payload.url()),
                    ABOUT_WINDOW_LABEL => {
                        app_metadata::send_app_metadata(webview.app_handle(), ABOUT_WINDOW_LABEL)
                    }
                    _ => {}
                }
            }
        })
        .setup(move |app| {
            append_startup_log("desktop process starting");
            append_startup_log(&format!(
                "desktop log path: {}",
                crate::logging::resolve_desktop_log_path(
                    runtime_paths::default_log_dir(),
                    DESKTOP_LOG_FILE,
                )
                .display()
            ));
            append_startup_log(&format!(
                "app version: {}, tauri version: {}",
                app.package_info().version,
                tauri::VERSION
            ));

            let app_handle = app.handle().clone();
            app.manage(ShellState::new(initial_autostart_flag()));

            main_window::create_shell_window(&app_handle, launch_options)?;

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                let quitting = app_handle
                    .try_state::<ShellState>()
                    .is_some_and(|state| state.is_quitting());
                // Closing the last visible window must not end the tray process.
                if code.is_none() && !quitting {
                    api.prevent_exit();
                }
            }
            RunEvent::Exit => append_shutdown_log("desktop process exiting"),
            _ => {}
        });
}
