use std::{
    process::{Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
};

use url::Url;

use crate::{append_desktop_log, ALLOWED_HOSTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkRoute {
    InApp,
    External,
}

pub(crate) fn is_allowed_host(host: &str) -> bool {
    ALLOWED_HOSTS.contains(&host)
}

/// In-app only when the host is exactly one of the allow-listed hosts. Anything that does
/// not parse, or has no host, goes to the system handler.
pub(crate) fn route_for_url(raw_url: &str) -> LinkRoute {
    match Url::parse(raw_url.trim()) {
        Ok(parsed) => route_for_parsed_url(&parsed),
        Err(_) => LinkRoute::External,
    }
}

pub(crate) fn route_for_parsed_url(url: &Url) -> LinkRoute {
    match url.host_str() {
        Some(host) if is_allowed_host(host) => LinkRoute::InApp,
        _ => LinkRoute::External,
    }
}

/// Pages served by the shell itself (offline/about) and blank documents.
pub(crate) fn is_shell_asset_url(url: &Url) -> bool {
    match url.scheme() {
        "tauri" => url.host_str() == Some("localhost"),
        "http" | "https" => url.host_str() == Some("tauri.localhost"),
        "about" => url.path() == "blank",
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationVerdict {
    /// Shell pages, blank documents and allow-listed hosts.
    Allow,
    /// A web page outside the allow-list reached without a click: a subframe or a redirect.
    AllowUnlisted,
    Refuse,
}

/// Verdict for a navigation the webview is about to perform. The webview reports subframe
/// loads and server redirects here too, so clicked links and new windows are routed by the
/// bridge script instead; this filter only refuses non-web schemes.
pub(crate) fn navigation_verdict(url: &Url) -> NavigationVerdict {
    if is_shell_asset_url(url) {
        return NavigationVerdict::Allow;
    }
    match url.scheme() {
        "http" | "https" => match route_for_parsed_url(url) {
            LinkRoute::InApp => NavigationVerdict::Allow,
            LinkRoute::External => NavigationVerdict::AllowUnlisted,
        },
        "about" | "data" | "blob" => NavigationVerdict::Allow,
        _ => NavigationVerdict::Refuse,
    }
}

/// `on_navigation` filter for the shell's webviews.
pub(crate) fn allow_in_app_navigation(url: &Url) -> bool {
    match navigation_verdict(url) {
        NavigationVerdict::Allow => true,
        NavigationVerdict::AllowUnlisted => {
            append_desktop_log(&format!("non-allow-listed load left in place: {url}"));
            true
        }
        NavigationVerdict::Refuse => {
            append_desktop_log(&format!("navigation refused: {url}"));
            false
        }
    }
}

pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" | "mailto" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https/mailto are allowed."
        )),
    }
}

/// Hands a URL to the system default handler, logging instead of failing.
pub(crate) fn open_external(raw_url: &str) {
    let parsed = match parse_openable_url(raw_url) {
        Ok(parsed) => parsed,
        Err(error) => {
            append_desktop_log(&format!("refused to open external URL '{raw_url}': {error}"));
            return;
        }
    };

    if let Err(error) = system_open_command(parsed.as_str()).and_then(spawn_reaped) {
        append_desktop_log(&format!("failed to open external URL {parsed}: {error}"));
    }
}

#[cfg(target_os = "macos")]
fn system_open_command(url: &str) -> Result<Command, String> {
    let mut command = Command::new("open");
    command.arg(url);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn system_open_command(url: &str) -> Result<Command, String> {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn system_open_command(url: &str) -> Result<Command, String> {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    Ok(command)
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn system_open_command(_url: &str) -> Result<Command, String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}

/// Starts the handler detached from our stdio and waits for it on a helper thread, so the
/// long-lived tray process never accumulates exited children.
pub(crate) fn spawn_reaped(mut command: Command) -> Result<JoinHandle<Option<ExitStatus>>, String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|error| format!("Failed to run '{program}': {error}"))?;

    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(error) => {
            append_desktop_log(&format!("failed to wait for '{program}': {error}"));
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_hosts_stay_in_app() {
        assert_eq!(route_for_url("https://lumo.proton.me/u/0/"), LinkRoute::InApp);
        assert_eq!(
            route_for_url("https://account.proton.me/login?product=lumo"),
            LinkRoute::InApp
        );
    }

    #[test]
    fn host_match_is_exact() {
        assert_eq!(route_for_url("https://proton.me/pricing"), LinkRoute::External);
        assert_eq!(route_for_url("https://mail.proton.me/"), LinkRoute::External);
        assert_eq!(
            route_for_url("https://lumo.proton.me.evil.example/"),
            LinkRoute::External
        );
        assert_eq!(
            route_for_url("https://evil.example/?next=https://lumo.proton.me"),
            LinkRoute::External
        );
    }

    #[test]
    fn unparsable_urls_route_externally() {
        assert_eq!(route_for_url("not a url"), LinkRoute::External);
        assert_eq!(route_for_url(""), LinkRoute::External);
        assert_eq!(route_for_url("/relative/path"), LinkRoute::External);
        assert_eq!(route_for_url("mailto:support@proton.me"), LinkRoute::External);
    }

    #[test]
    fn shell_assets_are_recognized() {
        let asset = Url::parse("tauri://localhost/offline.html").expect("url");
        let windows_asset = Url::parse("http://tauri.localhost/about.html").expect("url");
        let blank = Url::parse("about:blank").expect("url");
        let remote = Url::parse("https://lumo.proton.me").expect("url");
        assert!(is_shell_asset_url(&asset));
        assert!(is_shell_asset_url(&windows_asset));
        assert!(is_shell_asset_url(&blank));
        assert!(!is_shell_asset_url(&remote));
    }

    #[test]
    fn unlisted_subframes_and_redirects_stay_in_place() {
        let challenge = Url::parse("https://challenge.example/captcha?frame=1").expect("url");
        let sso_redirect = Url::parse("https://idp.example/oauth/authorize").expect("url");
        assert_eq!(navigation_verdict(&challenge), NavigationVerdict::AllowUnlisted);
        assert_eq!(navigation_verdict(&sso_redirect), NavigationVerdict::AllowUnlisted);
    }

    #[test]
    fn navigation_verdict_allows_shell_and_allow_listed_pages() {
        for raw in [
            "https://lumo.proton.me/u/0/",
            "https://account.proton.me/login",
            "tauri://localhost/offline.html",
            "about:blank",
            "data:text/html,<p>frame</p>",
        ] {
            let url = Url::parse(raw).expect("url");
            assert_eq!(navigation_verdict(&url), NavigationVerdict::Allow, "{raw}");
        }
    }

    #[test]
    fn navigation_verdict_refuses_non_web_schemes() {
        let file = Url::parse("file:///etc/passwd").expect("url");
        let custom = Url::parse("proton-mail://compose").expect("url");
        assert_eq!(navigation_verdict(&file), NavigationVerdict::Refuse);
        assert_eq!(navigation_verdict(&custom), NavigationVerdict::Refuse);
    }

    #[cfg(unix)]
    #[test]
    fn spawned_handlers_are_reaped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let handler = temp.path().join("xdg-open");
        std::fs::write(&handler, "#!/bin/sh\nexit 0\n").expect("handler");
        std::fs::set_permissions(&handler, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let reapers = (0..5)
            .map(|_| {
                let mut command = Command::new(&handler);
                command.arg("https://proton.me/");
                spawn_reaped(command).expect("spawn handler")
            })
            .collect::<Vec<_>>();
        for reaper in reapers {
            let status = reaper.join().expect("reaper thread");
            assert!(status.is_some_and(|status| status.success()));
        }

        #[cfg(target_os = "linux")]
        assert_eq!(defunct_children(), 0);
    }

    #[cfg(target_os = "linux")]
    fn defunct_children() -> usize {
        let Ok(tasks) = std::fs::read_dir("/proc/self/task") else {
            return 0;
        };
        tasks
            .flatten()
            .filter_map(|task| std::fs::read_to_string(task.path().join("children")).ok())
            .flat_map(|children| {
                children
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter_map(|pid| std::fs::read_to_string(format!("/proc/{pid}/stat")).ok())
            .filter(|stat| {
                stat.rsplit_once(')')
                    .and_then(|(_, rest)| rest.split_whitespace().next())
                    == Some("Z")
            })
            .count()
    }

    #[test]
    fn spawn_reaped_reports_missing_program() {
        let error = spawn_reaped(Command::new("/nonexistent/lumo-open-handler"))
            .expect_err("missing program");
        assert!(error.starts_with("Failed to run '/nonexistent/lumo-open-handler'"));
    }

    #[test]
    fn parse_openable_url_rejects_unsupported_schemes() {
        assert!(parse_openable_url("https://proton.me").is_ok());
        assert!(parse_openable_url("  ").is_err());
        let error = parse_openable_url("file:///etc/passwd").expect_err("file scheme");
        assert!(error.contains("Unsupported URL scheme 'file'"));
    }
}
