// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod camera;
pub mod confirm;
pub mod info;
pub mod splash;

use dioxus::prelude::*;
use mediscan_core::human_errors::Severity;

pub const PRIMARY_BUTTON: &str = "flex: 1; padding: 14px; border-radius: 10px; border: none; background: #007aff; color: white; font-size: 16px;";
pub const SECONDARY_BUTTON: &str = "flex: 1; padding: 14px; border-radius: 10px; border: 1px solid #ccc; background: white; color: #333; font-size: 16px;";

/// Status bar colours for an error: (background, text).
pub fn severity_colours(severity: Severity) -> (&'static str, &'static str) {
    match severity {
        Severity::Transient => ("#fff8e1", "#8a6d00"),
        Severity::ActionRequired => ("#fff0f0", "#c00"),
        Severity::Permanent => ("#f2f2f2", "#555"),
    }
}

/// The image under review, if there is one.
#[component]
pub fn ImagePreview(src: Option<String>) -> Element {
    rsx! {
        if let Some(src) = src {
            img {
                src: "{src}",
                alt: "Label photo",
                style: "display: block; max-width: 100%; max-height: 50vh; margin: 0 auto 16px; border-radius: 8px; border: 1px solid #ddd;",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mediscan_core::MediscanError;
    use mediscan_core::human_errors::humanize_error;

    use super::*;

    #[test]
    fn camera_errors_stand_out_from_network_blips() {
        let denied = humanize_error(&MediscanError::PermissionDenied("NotAllowedError".into()));
        let offline = humanize_error(&MediscanError::ConnectionFailed("refused".into()));
        assert_ne!(severity_colours(denied.severity), severity_colours(offline.severity));
        assert_eq!(severity_colours(denied.severity).1, "#c00");
    }
}
