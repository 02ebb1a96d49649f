use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, ShellState, MAIN_WINDOW_LABEL, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL,
    ZOOM_STEP_FACTOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoomGesture {
    In,
    Out,
    Reset,
}

pub(crate) fn next_zoom_level(current: i32, gesture: ZoomGesture) -> i32 {
    match gesture {
        ZoomGesture::In => (current + 1).min(MAX_ZOOM_LEVEL),
        ZoomGesture::Out => (current - 1).max(MIN_ZOOM_LEVEL),
        ZoomGesture::Reset => 0,
    }
}

/// Level 0 is natural size; each step scales by 20%.
pub(crate) fn zoom_factor_for_level(level: i32) -> f64 {
    ZOOM_STEP_FACTOR.powi(level)
}

pub(crate) fn apply_zoom_gesture(app_handle: &AppHandle, gesture: ZoomGesture) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("zoom skipped: main window not found");
        return;
    };

    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_desktop_log("zoom skipped: shell state unavailable");
        return;
    };
    let level = state.apply_zoom(gesture);
    append_desktop_log(&format!("zoom {gesture:?}: level={level}"));
    if let Err(error) = window.set_zoom(zoom_factor_for_level(level)) {
        append_desktop_log(&format!("failed to set zoom level {level}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_zoom_level_steps_by_one() {
        assert_eq!(next_zoom_level(0, ZoomGesture::In), 1);
        assert_eq!(next_zoom_level(0, ZoomGesture::Out), -1);
        assert_eq!(next_zoom_level(-2, ZoomGesture::In), -1);
    }

    #[test]
    fn reset_is_absolute() {
        assert_eq!(next_zoom_level(3, ZoomGesture::Reset), 0);
        assert_eq!(next_zoom_level(-5, ZoomGesture::Reset), 0);
        assert_eq!(next_zoom_level(0, ZoomGesture::Reset), 0);
    }

    #[test]
    fn next_zoom_level_is_clamped() {
        assert_eq!(next_zoom_level(MAX_ZOOM_LEVEL, ZoomGesture::In), MAX_ZOOM_LEVEL);
        assert_eq!(next_zoom_level(MIN_ZOOM_LEVEL, ZoomGesture::Out), MIN_ZOOM_LEVEL);
    }

    #[test]
    fn zoom_factor_for_level_is_natural_at_zero() {
        assert_eq!(zoom_factor_for_level(0), 1.0);
        assert!((zoom_factor_for_level(1) - 1.2).abs() < f64::EPSILON);
        assert!((zoom_factor_for_level(-1) - 1.0 / 1.2).abs() < 1e-12);
    }
}
