// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use dioxus::prelude::*;
use mediscan_controller::ViewController;

use super::PRIMARY_BUTTON;

#[component]
pub fn Confirmed() -> Element {
    let mut ctrl = use_context::<Signal<ViewController>>();

    rsx! {
        div { style: "text-align: center; padding-top: 48px;",
            div { style: "font-size: 64px;", "\u{2705}" }
            h1 { "All set" }
            p { style: "color: #666; margin-bottom: 32px;",
                "The label details have been confirmed."
            }
            button {
                style: "max-width: 360px; width: 100%; {PRIMARY_BUTTON}",
                onclick: move |_| ctrl.write().reset(),
                "Scan another label"
            }
        }
    }
}
