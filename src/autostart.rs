use std::fs;

use crate::runtime_paths::AutostartPaths;

/// Marker existence is the only source of truth for the autostart flag.
pub(crate) fn is_enabled(paths: &AutostartPaths) -> bool {
    paths.marker.exists()
}

/// Brings the marker file in line with `enabled`.
///
/// Enabling creates the autostart directory when needed and copies the template once; an
/// existing marker is trusted as-is and never overwritten. Disabling removes the marker if it
/// is present. Repeated calls with the same value are no-ops.
pub(crate) fn reconcile(paths: &AutostartPaths, enabled: bool) -> Result<(), String> {
    if enabled {
        enable(paths)
    } else {
        disable(paths)
    }
}

fn enable(paths: &AutostartPaths) -> Result<(), String> {
    if let Some(autostart_dir) = paths.marker.parent() {
        if !autostart_dir.exists() {
            fs::create_dir_all(autostart_dir).map_err(|error| {
                format!(
                    "Failed to create autostart directory {}: {}",
                    autostart_dir.display(),
                    error
                )
            })?;
        }
    }

    if paths.marker.exists() {
        return Ok(());
    }

    fs::copy(&paths.template, &paths.marker)
        .map(|_| ())
        .map_err(|error| {
            format!(
                "Failed to copy autostart template {} to {}: {}",
                paths.template.display(),
                paths.marker.display(),
                error
            )
        })
}

fn disable(paths: &AutostartPaths) -> Result<(), String> {
    if !paths.marker.exists() {
        return Ok(());
    }

    fs::remove_file(&paths.marker).map_err(|error| {
        format!(
            "Failed to remove autostart marker {}: {}",
            paths.marker.display(),
            error
        )
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    const TEMPLATE: &str = "[Desktop Entry]\nExec=lumo-desktop --tray\n";

    fn fixture(root: &Path) -> AutostartPaths {
        let install_dir = root.join("install");
        fs::create_dir_all(&install_dir).expect("install dir");
        let paths = AutostartPaths::new(install_dir, root.join("user-data"));
        fs::write(&paths.template, TEMPLATE).expect("template");
        paths
    }

    #[test]
    fn is_enabled_tracks_marker_presence() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = fixture(temp.path());

        assert!(!is_enabled(&paths));
        reconcile(&paths, true).expect("enable");
        assert!(is_enabled(&paths));
    }

    #[test]
    fn enable_creates_missing_autostart_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = fixture(temp.path());
        assert!(!paths.marker.parent().expect("parent").exists());

        reconcile(&paths, true).expect("enable");

        assert_eq!(fs::read_to_string(&paths.marker).expect("marker"), TEMPLATE);
    }

    #[test]
    fn enable_twice_keeps_single_unchanged_marker() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = fixture(temp.path());

        reconcile(&paths, true).expect("first enable");
        fs::write(&paths.template, "changed template").expect("rewrite template");
        reconcile(&paths, true).expect("second enable");

        let autostart_dir = paths.marker.parent().expect("parent");
        let entries = fs::read_dir(autostart_dir).expect("read dir").count();
        assert_eq!(entries, 1);
        assert_eq!(fs::read_to_string(&paths.marker).expect("marker"), TEMPLATE);
    }

    #[test]
    fn existing_marker_is_trusted_as_is() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = fixture(temp.path());
        fs::create_dir_all(paths.marker.parent().expect("parent")).expect("autostart dir");
        fs::write(&paths.marker, "user edited").expect("marker");

        reconcile(&paths, true).expect("enable");

        assert_eq!(
            fs::read_to_string(&paths.marker).expect("marker"),
            "user edited"
        );
    }

    #[test]
    fn off_on_off_round_trip_leaves_marker_absent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = fixture(temp.path());

        reconcile(&paths, false).expect("disable while disabled");
        reconcile(&paths, true).expect("enable");
        reconcile(&paths, false).expect("disable");
        reconcile(&paths, false).expect("disable again");

        assert!(!paths.marker.exists());
    }

    #[test]
    fn enable_reports_missing_template() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = AutostartPaths::new(temp.path().join("missing"), temp.path().join("data"));

        let error = reconcile(&paths, true).expect_err("template is missing");
        assert!(error.contains("Failed to copy autostart template"));
        assert!(!paths.marker.exists());
    }
}
