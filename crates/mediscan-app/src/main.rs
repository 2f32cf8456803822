// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MediScan: medication label scanner
//
// Entry point. Initialises logging and services, and launches the Dioxus UI.
// There is no router: the page shown is whatever the view controller's state
// says it is.

mod pages;
mod services;

use dioxus::prelude::*;
use mediscan_controller::{ViewController, ViewState};

use pages::camera::{Camera, Review};
use pages::confirm::Confirmed;
use pages::info::Info;
use pages::severity_colours;
use pages::splash::Splash;
use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("MediScan starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!(platform = s.platform_name(), "services initialised");
            Ok(s)
        }
        Err(e) => {
            tracing::error!(error = %e, "service initialisation failed");
            Err(e.to_string())
        }
    });

    match svc {
        Ok(svc) => rsx! {
            Shell { svc }
        },
        Err(message) => rsx! {
            div { style: "padding: 24px; font-family: system-ui, sans-serif;",
                h1 { "MediScan could not start" }
                p { style: "color: #c00;", "{message}" }
            }
        },
    }
}

/// Provides the controller and renders the page for its current state.
#[component]
fn Shell(svc: AppServices) -> Element {
    use_context_provider(|| svc.clone());
    let mut ctrl = use_context_provider(|| {
        Signal::new(ViewController::new(&svc.config().capture, svc.previews().clone()))
    });

    use_drop(move || {
        if let Ok(mut ctrl) = ctrl.try_write() {
            ctrl.shutdown();
        }
    });

    let page = match ctrl.read().state() {
        ViewState::Splash => rsx! { Splash {} },
        ViewState::Capturing => rsx! { Camera {} },
        ViewState::Reviewing => rsx! { Review {} },
        ViewState::AnalysisPending { .. }
        | ViewState::AnalysisError { .. }
        | ViewState::AnalysisComplete { .. } => rsx! { Info {} },
        ViewState::Confirmed => rsx! { Confirmed {} },
    };
    let status = ctrl.read().status().to_string();
    let notice = ctrl.read().notice().cloned();
    // The info page shows the suggestion next to the failure itself.
    let on_error_page = ctrl.read().error_message().is_some();
    let (footer_bg, footer_fg) = match &notice {
        Some(human) => severity_colours(human.severity),
        None => ("#fafafa", "#444"),
    };

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            header {
                style: "padding: 12px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa; display: flex; align-items: center; gap: 8px;",
                span { style: "font-size: 22px;", "\u{1F48A}" }
                strong { style: "font-size: 18px;", "MediScan" }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                {page}
            }

            if !status.is_empty() {
                footer { class: "status-bar",
                    style: "padding: 8px 16px; border-top: 1px solid #e0e0e0; background: {footer_bg}; color: {footer_fg}; font-size: 14px;",
                    p { style: "margin: 0;", "{status}" }
                    if let Some(human) = notice.filter(|_| !on_error_page) {
                        p { style: "margin: 4px 0 0; color: #666; font-size: 13px;", "{human.suggestion}" }
                    }
                }
            }
        }
    }
}
