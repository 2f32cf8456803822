// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Button handlers shared by the pages.
//
// Async work takes a ticket out of the controller, awaits the adapter with
// no borrow of the controller held, then hands the outcome back. Tasks are
// spawned on the root scope so they outlive the page that started them.

use dioxus::prelude::*;
use mediscan_bridge::NativeFilePicker;
use mediscan_controller::{AnalysisRequest, ViewController};
use tracing::{debug, warn};

use super::app_services::AppServices;

/// "Take Photo" / "Retake": open the camera.
pub fn start_camera(mut ctrl: Signal<ViewController>, svc: &AppServices) {
    let started = ctrl.write().start_camera();
    let ticket = match started {
        Ok(ticket) => ticket,
        Err(e) => {
            warn!(error = %e, "camera not started");
            return;
        }
    };

    let bridge = svc.bridge();
    spawn_forever(async move {
        let outcome = ticket.run(bridge.as_ref()).await;
        match ctrl.try_write() {
            Ok(mut ctrl) => {
                if let Err(e) = ctrl.camera_acquired(outcome) {
                    warn!(error = %e, "camera unavailable");
                }
            }
            Err(_) => outcome.discard(),
        }
    });
}

/// "Upload": pick a file and, if it is an image, analyze it.
pub fn upload(mut ctrl: Signal<ViewController>, svc: &AppServices) {
    let picked = match svc.bridge().pick_image() {
        Ok(Some(file)) => file,
        Ok(None) => {
            debug!("file picker cancelled");
            return;
        }
        Err(e) => {
            ctrl.write().report(&e);
            return;
        }
    };

    let selected = ctrl.write().select_file(picked);
    match selected {
        Ok(request) => analyze(ctrl, svc, request),
        Err(e) => debug!(error = %e, "selection not accepted"),
    }
}

/// "Scan & Analyze" / "Try Again": submit the current image.
pub fn resubmit(mut ctrl: Signal<ViewController>, svc: &AppServices) {
    let begun = ctrl.write().begin_analysis();
    match begun {
        Ok(request) => analyze(ctrl, svc, request),
        Err(e) => warn!(error = %e, "analysis not started"),
    }
}

fn analyze(mut ctrl: Signal<ViewController>, svc: &AppServices, request: AnalysisRequest) {
    let analyzer = svc.analyzer();
    spawn_forever(async move {
        let outcome = request.run(&analyzer).await;
        if let Ok(mut ctrl) = ctrl.try_write() {
            ctrl.finish_analysis(outcome);
        }
    });
}
