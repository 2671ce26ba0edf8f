//! Link opening.
//!
//! Opens URLs in the default browser. Only `http://` and `https://` URLs
//! are accepted; `javascript:`, `file://`, `data:` and everything else are refused.

use std::process::Command;

use crate::error::ActionError;

/// Fire-and-forget link opener. The result only reports whether the launch was attempted.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), ActionError>;
}

/// Reject anything that is not a non-empty http(s) URL.
pub fn validate_url(url: &str) -> Result<(), ActionError> {
    if url.is_empty() {
        return Err(ActionError::InvalidUrl("URL must not be empty".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ActionError::InvalidUrl(format!(
            "Unsupported URL scheme. Only http:// and https:// are allowed, got: {}",
            url
        )));
    }
    Ok(())
}

/// Opens links with the platform's URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> Result<(), ActionError> {
        validate_url(url)?;

        let spawned = if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/c", "start", "", url]).spawn()
        } else if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };

        spawned.map_err(|e| ActionError::LinkOpen(e.to_string()))?;
        tracing::info!(url = %url, "Opened URL");
        Ok(())
    }
}
