//! Dagster web UI links and the platform browser opener.

use color_eyre::eyre::{eyre, Result};

/// `<backend>/locations/<repository>@<location>/jobs`
pub fn repository_url(backend_url: &str, name: &str, location: &str) -> String {
    format!("{}/locations/{name}@{location}/jobs", backend_url.trim_end_matches('/'))
}

pub fn job_url(backend_url: &str, name: &str, location: &str, job: &str) -> String {
    format!("{}/{job}/playground", repository_url(backend_url, name, location))
}

pub fn run_url(backend_url: &str, run_id: &str) -> String {
    format!("{}/runs/{run_id}", backend_url.trim_end_matches('/'))
}

/// Opens a URL in the user's default browser.
///
/// WSL builds as `target_os = "linux"` but has no `xdg-open`, so it is detected at runtime.
pub fn open_in_browser_impl(url: &str) -> Result<()> {
    use std::process::{Command, Stdio};

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(eyre!("Refusing to open non-HTTP URL: {url}"));
    }

    let wsl = std::env::var_os("WSL_DISTRO_NAME").is_some();
    let spawn = |program: &str, args: &[&str]| {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    };

    if cfg!(target_os = "windows") {
        // Empty title argument so `start` never reads the URL as a window title.
        return spawn("cmd", &["/C", "start", "", url])
            .map_err(|e| eyre!("Failed to open browser: {e}"));
    }

    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if wsl {
        "wslview"
    } else {
        "xdg-open"
    };

    match spawn(opener, &[url]) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(opener, "browser opener not installed");
        }
        Err(e) => return Err(eyre!("Failed to open browser with {opener}: {e}")),
    }

    if wsl {
        return spawn("cmd.exe", &["/C", "start", "", url])
            .map_err(|e| eyre!("Failed to open browser via cmd.exe: {e}"));
    }

    Err(eyre!(
        "No browser opener found. On WSL install wslu; on Linux install xdg-utils."
    ))
}
