use std::{fs, path::Path};

use serde::Deserialize;
use tauri::{AppHandle, Emitter, Manager};

use crate::{append_desktop_log, append_shutdown_log, runtime_paths, APP_MANIFEST_NAME};

#[derive(Debug, Clone, Deserialize)]
struct ManifestBugs {
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AppManifest {
    version: String,
    description: String,
    title: String,
    bugs: ManifestBugs,
    homepage: String,
    author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppMetadata {
    pub(crate) version: String,
    pub(crate) description: String,
    pub(crate) title: String,
    pub(crate) bugs_url: String,
    pub(crate) homepage: String,
    pub(crate) author: String,
}

impl From<AppManifest> for AppMetadata {
    fn from(manifest: AppManifest) -> Self {
        Self {
            version: manifest.version,
            description: manifest.description,
            title: manifest.title,
            bugs_url: manifest.bugs.url,
            homepage: manifest.homepage,
            author: manifest.author,
        }
    }
}

impl AppMetadata {
    /// One `(channel, value)` pair per field, in emission order.
    pub(crate) fn field_events(&self) -> [(&'static str, &str); 6] {
        [
            ("app-version", self.version.as_str()),
            ("app-description", self.description.as_str()),
            ("app-title", self.title.as_str()),
            ("app-bugs-url", self.bugs_url.as_str()),
            ("app-homepage", self.homepage.as_str()),
            ("app-author", self.author.as_str()),
        ]
    }
}

pub(crate) fn read_app_metadata(manifest_path: &Path) -> Result<AppMetadata, String> {
    let raw = fs::read_to_string(manifest_path).map_err(|error| {
        format!(
            "Failed to read app manifest {}: {}",
            manifest_path.display(),
            error
        )
    })?;
    let manifest: AppManifest = serde_json::from_str(&raw).map_err(|error| {
        format!(
            "Failed to parse app manifest {}: {}",
            manifest_path.display(),
            error
        )
    })?;
    Ok(manifest.into())
}

/// Emits every field through `emit`, one event per field, continuing past failures.
/// Returns the failures.
pub(crate) fn emit_metadata_fields<E>(metadata: &AppMetadata, mut emit: E) -> Vec<String>
where
    E: FnMut(&'static str, &str) -> Result<(), String>,
{
    metadata
        .field_events()
        .into_iter()
        .filter_map(|(channel, value)| {
            emit(channel, value)
                .err()
                .map(|error| format!("failed to send {channel}: {error}"))
        })
        .collect()
}

fn resolve_manifest_path(app_handle: &AppHandle) -> Result<std::path::PathBuf, String> {
    let resource_dir = app_handle.path().resource_dir().ok();
    runtime_paths::app_manifest_candidates(resource_dir)
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| format!("App manifest {APP_MANIFEST_NAME} is not installed."))
}

/// Reads the manifest afresh and pushes each field to `target_label` as its own event.
/// An unreadable manifest means a broken installation and ends the process.
pub(crate) fn send_app_metadata(app_handle: &AppHandle, target_label: &str) {
    let metadata = match resolve_manifest_path(app_handle).and_then(|path| read_app_metadata(&path))
    {
        Ok(metadata) => metadata,
        Err(error) => {
            append_shutdown_log(&format!("fatal: {error}"));
            app_handle.exit(1);
            return;
        }
    };

    append_desktop_log(&format!(
        "sending app metadata to {target_label}: {} {}",
        metadata.title, metadata.version
    ));
    let failures = emit_metadata_fields(&metadata, |channel, value| {
        app_handle
            .emit_to(target_label, channel, value)
            .map_err(|error| error.to_string())
    });
    for failure in failures {
        append_desktop_log(&format!("{failure} (target {target_label})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "name": "lumo-ai",
        "title": "Proton Lumo.ai",
        "version": "1.2.0",
        "description": "Unofficial desktop shell for Proton Lumo.ai",
        "homepage": "https://github.com/kenvandine/lumo.ai",
        "bugs": { "url": "https://github.com/kenvandine/lumo.ai/issues" },
        "author": "Ken VanDine"
    }"#;

    #[test]
    fn field_events_emit_six_named_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app-manifest.json");
        fs::write(&path, MANIFEST).expect("manifest");

        let metadata = read_app_metadata(&path).expect("metadata");
        let events = metadata.field_events();

        assert_eq!(
            events,
            [
                ("app-version", "1.2.0"),
                ("app-description", "Unofficial desktop shell for Proton Lumo.ai"),
                ("app-title", "Proton Lumo.ai"),
                ("app-bugs-url", "https://github.com/kenvandine/lumo.ai/issues"),
                ("app-homepage", "https://github.com/kenvandine/lumo.ai"),
                ("app-author", "Ken VanDine"),
            ]
        );
    }

    #[test]
    fn every_read_reflects_current_manifest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app-manifest.json");
        fs::write(&path, MANIFEST).expect("manifest");
        assert_eq!(read_app_metadata(&path).expect("first").version, "1.2.0");

        fs::write(&path, MANIFEST.replace("1.2.0", "1.3.0")).expect("rewrite");
        assert_eq!(read_app_metadata(&path).expect("second").version, "1.3.0");
    }

    #[test]
    fn every_request_emits_six_fresh_events() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app-manifest.json");
        let mut emitted: Vec<(String, String)> = Vec::new();

        fs::write(&path, MANIFEST).expect("manifest");
        let metadata = read_app_metadata(&path).expect("first read");
        let failures = emit_metadata_fields(&metadata, |channel, value| {
            emitted.push((channel.to_string(), value.to_string()));
            Ok(())
        });
        assert!(failures.is_empty());

        fs::write(&path, MANIFEST.replace("Ken VanDine", "Lumo Maintainers")).expect("rewrite");
        let metadata = read_app_metadata(&path).expect("second read");
        emit_metadata_fields(&metadata, |channel, value| {
            emitted.push((channel.to_string(), value.to_string()));
            Ok(())
        });

        assert_eq!(emitted.len(), 12);
        assert_eq!(
            emitted[5],
            ("app-author".to_string(), "Ken VanDine".to_string())
        );
        assert_eq!(
            emitted[11],
            ("app-author".to_string(), "Lumo Maintainers".to_string())
        );
        assert_eq!(
            emitted[6],
            ("app-version".to_string(), "1.2.0".to_string())
        );
    }

    #[test]
    fn emission_continues_past_a_failed_field() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app-manifest.json");
        fs::write(&path, MANIFEST).expect("manifest");
        let metadata = read_app_metadata(&path).expect("metadata");

        let mut attempted = Vec::new();
        let failures = emit_metadata_fields(&metadata, |channel, _value| {
            attempted.push(channel);
            if channel == "app-title" {
                Err("window closed".to_string())
            } else {
                Ok(())
            }
        });

        assert_eq!(attempted.len(), 6);
        assert_eq!(failures, vec!["failed to send app-title: window closed".to_string()]);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let error = read_app_metadata(&temp.path().join("absent.json")).expect_err("missing");
        assert!(error.starts_with("Failed to read app manifest"));
    }

    #[test]
    fn manifest_without_bugs_url_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app-manifest.json");
        fs::write(
            &path,
            r#"{"title":"t","version":"1","description":"d","homepage":"h","author":"a"}"#,
        )
        .expect("manifest");

        let error = read_app_metadata(&path).expect_err("bugs missing");
        assert!(error.starts_with("Failed to parse app manifest"));
    }
}
