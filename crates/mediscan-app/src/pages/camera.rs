// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera page (live preview and shutter) and the review page shown after a
// capture.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dioxus::prelude::*;
use mediscan_controller::ViewController;
use mediscan_core::types::SourceKind;
use mediscan_imaging::{RasterSurface, RgbaFrame};

use super::{ImagePreview, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::services::actions;
use crate::services::app_services::AppServices;

const PREVIEW_INTERVAL_MS: u64 = 100;

#[component]
pub fn Camera() -> Element {
    let mut ctrl = use_context::<Signal<ViewController>>();
    let svc = use_context::<AppServices>();
    let mut live = use_signal(|| Option::<String>::None);

    // Pull frames from the stream for the viewfinder. `peek` keeps this
    // task from re-running on every controller change.
    let _viewfinder = use_resource(move || async move {
        let mut surface = RasterSurface::new();
        loop {
            tokio::time::sleep(std::time::Duration::from_millis(PREVIEW_INTERVAL_MS)).await;
            let frame = ctrl.peek().live_frame();
            if let Some(frame) = frame {
                match frame_data_url(&mut surface, &frame) {
                    Ok(url) => live.set(Some(url)),
                    Err(e) => tracing::debug!(error = %e, "viewfinder frame skipped"),
                }
            }
        }
    });

    let ready = ctrl.read().has_live_stream();
    let upload_allowed = ctrl.read().sources().allows(SourceKind::Upload);

    rsx! {
        div {
            h2 { "Scan a label" }
            div { style: "background: #111; border-radius: 8px; min-height: 240px; display: flex; align-items: center; justify-content: center; margin-bottom: 16px;",
                if let Some(src) = live.read().clone() {
                    img { src: "{src}", alt: "Camera preview", style: "max-width: 100%; border-radius: 8px;" }
                } else {
                    span { style: "color: #aaa;", "Waiting for camera..." }
                }
            }

            div { style: "display: flex; gap: 8px;",
                button {
                    style: SECONDARY_BUTTON,
                    onclick: move |_| {
                        if let Err(e) = ctrl.write().back() {
                            tracing::warn!(error = %e, "back failed");
                        }
                    },
                    "Back"
                }
                button {
                    style: PRIMARY_BUTTON,
                    disabled: !ready,
                    onclick: move |_| {
                        if let Err(e) = ctrl.write().take_photo() {
                            tracing::warn!(error = %e, "capture failed");
                        }
                    },
                    "\u{1F4F8} Capture"
                }
            }

            if upload_allowed {
                button {
                    style: "width: 100%; margin-top: 12px; padding: 10px; border: none; background: none; color: #007aff;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| actions::upload(ctrl, &svc)
                    },
                    "Upload a photo instead"
                }
            }
        }
    }
}

#[component]
pub fn Review() -> Element {
    let mut ctrl = use_context::<Signal<ViewController>>();
    let svc = use_context::<AppServices>();
    let preview = ctrl.read().preview_data_url();
    let caption = ctrl.read().artifact().map(|artifact| {
        let time = artifact.captured_at().format("%H:%M:%S");
        match artifact.dimensions() {
            Some((w, h)) => format!("Captured {time} UTC, {w}\u{d7}{h}"),
            None => format!("Captured {time} UTC"),
        }
    });

    rsx! {
        div {
            h2 { "Check the photo" }
            ImagePreview { src: preview }
            if let Some(caption) = caption {
                p { style: "text-align: center; color: #888; font-size: 13px; margin: -8px 0 16px;", "{caption}" }
            }
            div { style: "display: flex; gap: 8px;",
                button {
                    style: SECONDARY_BUTTON,
                    onclick: {
                        let svc = svc.clone();
                        move |_| actions::start_camera(ctrl, &svc)
                    },
                    "Retake"
                }
                button {
                    style: PRIMARY_BUTTON,
                    onclick: {
                        let svc = svc.clone();
                        move |_| actions::resubmit(ctrl, &svc)
                    },
                    "\u{1F50D} Scan & Analyze"
                }
            }
            button {
                style: "width: 100%; margin-top: 12px; padding: 10px; border: none; background: none; color: #666;",
                onclick: move |_| {
                    if let Err(e) = ctrl.write().back() {
                        tracing::warn!(error = %e, "back failed");
                    }
                },
                "Back to home"
            }
        }
    }
}

fn frame_data_url(
    surface: &mut RasterSurface,
    frame: &RgbaFrame,
) -> mediscan_core::error::Result<String> {
    let png = surface.rasterize(frame)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
