// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Info page: analysis progress, failure or extracted fields, shown under
// the image that was sent.

use dioxus::prelude::*;
use mediscan_controller::{ViewController, ViewState};
use mediscan_core::types::SourceKind;

use super::{ImagePreview, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::services::actions;
use crate::services::app_services::AppServices;

#[component]
pub fn Info() -> Element {
    let mut ctrl = use_context::<Signal<ViewController>>();
    let svc = use_context::<AppServices>();

    let preview = ctrl.read().preview_data_url();
    let sources = ctrl.read().sources();
    let pending = matches!(ctrl.read().state(), ViewState::AnalysisPending { .. });
    let error = ctrl.read().error_message().map(str::to_string);
    let notice = ctrl.read().notice().cloned();
    let retriable = notice.as_ref().is_none_or(|human| human.retriable);
    let fields = ctrl.read().result_fields();

    rsx! {
        div {
            ImagePreview { src: preview }

            if pending {
                div { style: "text-align: center; padding: 24px; color: #007aff;",
                    p { style: "font-size: 18px;", "Analyzing..." }
                    p { style: "color: #888; font-size: 14px;", "Reading the label. This can take a few seconds." }
                }
            }

            if let Some(message) = error {
                div { style: "padding: 16px; border-radius: 8px; background: #fff0f0; border: 1px solid #ffcccc; margin-bottom: 16px;",
                    strong { style: "color: #c00;", "Analysis failed" }
                    p { style: "margin: 8px 0 0;", "{message}" }
                    if let Some(human) = notice {
                        p { style: "margin: 8px 0 0; color: #666; font-size: 14px;", "{human.suggestion}" }
                    }
                }
                div { style: "display: flex; gap: 8px;",
                    if sources.allows(SourceKind::Camera) {
                        button {
                            style: SECONDARY_BUTTON,
                            onclick: {
                                let svc = svc.clone();
                                move |_| actions::start_camera(ctrl, &svc)
                            },
                            "Retake"
                        }
                    }
                    if retriable {
                        button {
                            style: PRIMARY_BUTTON,
                            onclick: {
                                let svc = svc.clone();
                                move |_| actions::resubmit(ctrl, &svc)
                            },
                            "Try Again"
                        }
                    }
                }
            }

            if !fields.is_empty() {
                h2 { "Label details" }
                table { style: "width: 100%; border-collapse: collapse; margin-bottom: 16px;",
                    tbody {
                        for field in fields {
                            tr { key: "{field.key}",
                                th { style: "text-align: left; padding: 8px; border-bottom: 1px solid #eee; color: #666; width: 40%;",
                                    "{field.label}"
                                }
                                td { style: "padding: 8px; border-bottom: 1px solid #eee;",
                                    "{field.value}"
                                }
                            }
                        }
                    }
                }
                button {
                    style: "width: 100%; {PRIMARY_BUTTON}",
                    onclick: move |_| {
                        if let Err(e) = ctrl.write().confirm() {
                            tracing::warn!(error = %e, "confirm failed");
                        }
                    },
                    "\u{2705} Confirm"
                }
            }

            if sources.allows(SourceKind::Upload) {
                button {
                    style: "width: 100%; margin-top: 12px; padding: 10px; border: none; background: none; color: #007aff;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| actions::upload(ctrl, &svc)
                    },
                    "Upload a different photo"
                }
            }

            button {
                style: "width: 100%; margin-top: 4px; padding: 10px; border: none; background: none; color: #666;",
                onclick: move |_| ctrl.write().reset(),
                if pending { "Cancel" } else { "Start over" }
            }
        }
    }
}
