// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Displayable preview resources.
//
// Each image on screen is addressed through a `blob:mediscan/<uuid>` URL
// backed by an entry in the registry. A handle must be released once it is
// no longer rendered; `PreviewHandle::release` consumes the handle and its
// `Drop` impl releases any handle that was not released explicitly, so every
// handle is released exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;
use uuid::Uuid;

const URL_PREFIX: &str = "blob:mediscan/";

struct PreviewEntry {
    media_type: String,
    bytes: Arc<[u8]>,
}

/// Registry of live preview resources. Clones share the same entries.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<Uuid, PreviewEntry>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, PreviewEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register image bytes and hand out a URL for them.
    pub fn create(&self, media_type: &str, bytes: Arc<[u8]>) -> PreviewHandle {
        let id = Uuid::new_v4();
        let url = format!("{URL_PREFIX}{id}");
        self.lock().insert(
            id,
            PreviewEntry {
                media_type: media_type.to_string(),
                bytes,
            },
        );
        debug!(%url, "preview created");
        PreviewHandle {
            id,
            url,
            registry: Some(self.clone()),
        }
    }

    /// Number of handles created and not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// Whether `url` still resolves.
    pub fn is_live(&self, url: &str) -> bool {
        parse_url(url).is_some_and(|id| self.lock().contains_key(&id))
    }

    /// Inline `data:` URL for a live preview, for renderers that cannot
    /// resolve `blob:` URLs themselves.
    pub fn data_url(&self, url: &str) -> Option<String> {
        let id = parse_url(url)?;
        let entries = self.lock();
        let entry = entries.get(&id)?;
        Some(format!(
            "data:{};base64,{}",
            entry.media_type,
            STANDARD.encode(&entry.bytes)
        ))
    }

    fn remove(&self, id: &Uuid) {
        if self.lock().remove(id).is_some() {
            debug!(%id, "preview released");
        }
    }
}

impl std::fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

fn parse_url(url: &str) -> Option<Uuid> {
    url.strip_prefix(URL_PREFIX)?.parse().ok()
}

/// A displayable URL for one image, valid until released.
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    registry: Option<PreviewRegistry>,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Release the underlying resource now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.remove(&self.id);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.url).finish()
    }
}

/// Release a preview handle. Equivalent to [`PreviewHandle::release`].
pub fn release_preview(handle: PreviewHandle) {
    handle.release();
}
