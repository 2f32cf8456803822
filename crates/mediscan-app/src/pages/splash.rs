// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home screen: choose between the camera and an uploaded photo.

use dioxus::prelude::*;
use mediscan_controller::ViewController;
use mediscan_core::types::SourceKind;

use super::{PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::services::actions;
use crate::services::app_services::AppServices;

#[component]
pub fn Splash() -> Element {
    let ctrl = use_context::<Signal<ViewController>>();
    let svc = use_context::<AppServices>();
    let sources = ctrl.read().sources();

    rsx! {
        div { style: "text-align: center; padding-top: 48px;",
            div { style: "font-size: 64px;", "\u{1F48A}" }
            h1 { "MediScan" }
            p { style: "color: #666; margin-bottom: 32px;",
                "Photograph a medication label to read its name, strength and directions."
            }

            div { style: "display: flex; flex-direction: column; gap: 12px; max-width: 360px; margin: 0 auto;",
                if sources.allows(SourceKind::Camera) {
                    button {
                        style: PRIMARY_BUTTON,
                        onclick: {
                            let svc = svc.clone();
                            move |_| actions::start_camera(ctrl, &svc)
                        },
                        "\u{1F4F7} Take Photo"
                    }
                }
                if sources.allows(SourceKind::Upload) {
                    button {
                        style: SECONDARY_BUTTON,
                        onclick: {
                            let svc = svc.clone();
                            move |_| actions::upload(ctrl, &svc)
                        },
                        "\u{1F4C1} Upload Photo"
                    }
                }
            }
        }
    }
}
