use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tauri::{
    webview::PageLoadEvent, AppHandle, Manager, RunEvent, WebviewUrl, WebviewWindowBuilder,
    WindowEvent,
};
use tokio::sync::mpsc;
use url::Url;

use crate::{
    append_capture_log,
    capture_timer::{Clock, DelayTimer, TimerOutcome, TokioClock},
    APP_URL, CAPTURE_FAILURE_DELAY, CAPTURE_LOAD_TIMEOUT, CAPTURE_REACHABILITY_TIMEOUT,
    CAPTURE_SETTLE_DELAY, CAPTURE_VIEWPORT_HEIGHT, CAPTURE_VIEWPORT_WIDTH, CAPTURE_WINDOW_LABEL,
    DEFAULT_SCREENSHOT_PATH, SCREENSHOT_PATH_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadSignal {
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CapturePlan {
    pub(crate) delay: Duration,
    pub(crate) load_failed: bool,
}

pub(crate) fn capture_plan(signal: &LoadSignal) -> CapturePlan {
    match signal {
        LoadSignal::Finished => CapturePlan {
            delay: CAPTURE_SETTLE_DELAY,
            load_failed: false,
        },
        LoadSignal::Failed(_) => CapturePlan {
            delay: CAPTURE_FAILURE_DELAY,
            load_failed: true,
        },
    }
}

/// A finished load only counts when the remote also answered over HTTP: webviews report
/// their own error pages as finished loads.
pub(crate) fn settle_load_outcome(
    load: LoadSignal,
    reachability: Result<(), String>,
) -> LoadSignal {
    match (load, reachability) {
        (LoadSignal::Finished, Ok(())) => LoadSignal::Finished,
        (LoadSignal::Finished, Err(error)) => LoadSignal::Failed(error),
        (failed @ LoadSignal::Failed(_), _) => failed,
    }
}

/// 0 only when the page loaded and the image was written.
pub(crate) fn exit_code(plan: CapturePlan, capture_result: &Result<PathBuf, String>) -> i32 {
    if plan.load_failed || capture_result.is_err() {
        1
    } else {
        0
    }
}

pub(crate) fn resolve_screenshot_path(env_value: Option<String>) -> PathBuf {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCREENSHOT_PATH))
}

/// Fetches the URL once. Transport failures (DNS, TCP, TLS) and server errors count as
/// unreachable; client errors still render a page and are accepted.
pub(crate) async fn check_remote_reachable(raw_url: &str, timeout: Duration) -> Result<(), String> {
    let url = Url::parse(raw_url).map_err(|error| format!("Invalid URL {raw_url}: {error}"))?;
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| format!("Failed to build HTTP client: {error}"))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| format!("Failed to reach {raw_url}: {error}"))?;

    let status = response.status();
    if status.is_server_error() {
        return Err(format!("{raw_url} answered with {status}"));
    }
    Ok(())
}

fn capture_window_title() -> String {
    format!("lumo-capture-{}", std::process::id())
}

pub(crate) fn write_png(image: &image::RgbaImage, path: &Path) -> Result<PathBuf, String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create screenshot directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|error| format!("Failed to write screenshot {}: {}", path.display(), error))?;

    let written = fs::metadata(path)
        .map_err(|error| format!("Failed to stat screenshot {}: {}", path.display(), error))?;
    if written.len() == 0 {
        return Err(format!("Screenshot {} is empty.", path.display()));
    }
    Ok(path.to_path_buf())
}

fn capture_window_to(title: &str, path: &Path) -> Result<PathBuf, String> {
    let windows =
        xcap::Window::all().map_err(|error| format!("Failed to list windows: {error}"))?;
    let target = windows
        .into_iter()
        .find(|window| window.title().map(|t| t == title).unwrap_or(false))
        .ok_or_else(|| format!("Capture window '{title}' not found."))?;
    let image = target
        .capture_image()
        .map_err(|error| format!("Failed to capture window: {error}"))?;
    if image.width() == 0 || image.height() == 0 {
        return Err("Captured image is empty.".to_string());
    }
    write_png(&image, path)
}

async fn run_capture_task<C: Clock>(
    app_handle: AppHandle,
    timer: Arc<DelayTimer<C>>,
    mut load_rx: mpsc::UnboundedReceiver<LoadSignal>,
    reachability: tauri::async_runtime::JoinHandle<Result<(), String>>,
    output_path: PathBuf,
) {
    let load = tokio::select! {
        received = load_rx.recv() => received
            .unwrap_or_else(|| LoadSignal::Failed("load signal channel closed".to_string())),
        outcome = timer.wait(CAPTURE_LOAD_TIMEOUT) => match outcome {
            TimerOutcome::Elapsed => LoadSignal::Failed(format!(
                "no load-finished signal within {}s",
                CAPTURE_LOAD_TIMEOUT.as_secs()
            )),
            TimerOutcome::Cancelled => LoadSignal::Failed("capture cancelled".to_string()),
        },
    };
    let reachability = reachability
        .await
        .unwrap_or_else(|error| Err(format!("Reachability check failed: {error}")));
    let signal = settle_load_outcome(load, reachability);

    let plan = capture_plan(&signal);
    match &signal {
        LoadSignal::Finished => append_capture_log("page loaded, waiting for content to render"),
        LoadSignal::Failed(reason) => append_capture_log(&format!("failed to load: {reason}")),
    }

    if timer.wait(plan.delay).await == TimerOutcome::Cancelled {
        append_capture_log("capture cancelled before the render delay elapsed");
        app_handle.exit(1);
        return;
    }

    append_capture_log("capturing screenshot");
    let title = capture_window_title();
    let path = output_path.clone();
    let capture_result =
        tauri::async_runtime::spawn_blocking(move || capture_window_to(&title, &path))
            .await
            .unwrap_or_else(|error| Err(format!("Capture task failed: {error}")));

    match &capture_result {
        Ok(path) if plan.load_failed => append_capture_log(&format!(
            "screenshot of error state saved to {}",
            path.display()
        )),
        Ok(path) => append_capture_log(&format!("screenshot saved to {}", path.display())),
        Err(error) => append_capture_log(&format!("error capturing screenshot: {error}")),
    }

    app_handle.exit(exit_code(plan, &capture_result));
}

/// Window traits for capture mode. The window stays mapped and in normal stacking order:
/// a window grab of an obscured window reads whatever covers it on X11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CaptureWindowOptions {
    pub(crate) decorations: bool,
    pub(crate) skip_taskbar: bool,
    pub(crate) focused: bool,
    pub(crate) always_on_bottom: bool,
}

pub(crate) const CAPTURE_WINDOW_OPTIONS: CaptureWindowOptions = CaptureWindowOptions {
    decorations: false,
    skip_taskbar: true,
    focused: false,
    always_on_bottom: false,
};

fn create_capture_window(
    app_handle: &AppHandle,
    load_tx: mpsc::UnboundedSender<LoadSignal>,
) -> Result<(), String> {
    let app_url =
        Url::parse(APP_URL).map_err(|error| format!("Invalid app URL {APP_URL}: {error}"))?;

    let options = CAPTURE_WINDOW_OPTIONS;
    let window =
        WebviewWindowBuilder::new(app_handle, CAPTURE_WINDOW_LABEL, WebviewUrl::External(app_url))
            .title(capture_window_title())
            .inner_size(CAPTURE_VIEWPORT_WIDTH, CAPTURE_VIEWPORT_HEIGHT)
            .decorations(options.decorations)
            .skip_taskbar(options.skip_taskbar)
            .focused(options.focused)
            .always_on_bottom(options.always_on_bottom)
            .on_page_load(move |_window, payload| {
                if matches!(payload.event(), PageLoadEvent::Finished) {
                    let _ = load_tx.send(LoadSignal::Finished);
                }
            })
            .build()
            .map_err(|error| format!("Failed to create capture window: {error}"))?;
    if let Err(error) = window.remove_menu() {
        append_capture_log(&format!("failed to remove capture window menu: {error}"));
    }
    Ok(())
}

struct CaptureTimerState(Arc<DelayTimer<TokioClock>>);

fn cancel_pending_waits(app_handle: &AppHandle) {
    if let Some(state) = app_handle.try_state::<CaptureTimerState>() {
        state.0.cancel();
    }
}

pub(crate) fn run() {
    let output_path = resolve_screenshot_path(env::var(SCREENSHOT_PATH_ENV).ok());
    let timer = Arc::new(DelayTimer::new(Arc::new(TokioClock)));

    tauri::Builder::default()
        .manage(CaptureTimerState(timer.clone()))
        .on_window_event(|window, event| {
            if window.label() == CAPTURE_WINDOW_LABEL
                && matches!(event, WindowEvent::CloseRequested { .. })
            {
                append_capture_log("capture window closed before capture");
                cancel_pending_waits(window.app_handle());
            }
        })
        .setup(move |app| {
            append_capture_log(&format!(
                "app version: {}, tauri version: {}",
                app.package_info().version,
                tauri::VERSION
            ));
            append_capture_log(&format!(
                "creating window for screenshot, output {}",
                output_path.display()
            ));

            let app_handle = app.handle().clone();
            let (load_tx, load_rx) = mpsc::unbounded_channel();

            let reachability = tauri::async_runtime::spawn(async {
                check_remote_reachable(APP_URL, CAPTURE_REACHABILITY_TIMEOUT).await
            });

            create_capture_window(&app_handle, load_tx)?;
            tauri::async_runtime::spawn(run_capture_task(
                app_handle,
                timer.clone(),
                load_rx,
                reachability,
                output_path.clone(),
            ));
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            if let RunEvent::Exit = event {
                cancel_pending_waits(app_handle);
            }
        });
}
