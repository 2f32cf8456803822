// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: builds the platform bridge and the analysis client
// from the configuration and hands them to the Dioxus pages.

use std::path::Path;
use std::sync::Arc;

use mediscan_analysis::AnalysisClient;
use mediscan_bridge::{PlatformBridge, PreviewRegistry, platform_bridge};
use mediscan_core::AppConfig;
use mediscan_core::error::Result;
use tracing::{info, warn};

use super::data_dir;

const CONFIG_FILE: &str = "config.json";

struct Inner {
    bridge: Arc<dyn PlatformBridge>,
    analyzer: AnalysisClient,
    previews: PreviewRegistry,
    config: AppConfig,
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`. Clones share the same services.
#[derive(Clone)]
pub struct AppServices {
    inner: Arc<Inner>,
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl AppServices {
    /// Initialise from the configuration in the data directory. Call once at
    /// app startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");
        Self::with_config(load_config(&dir))
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let analyzer = AnalysisClient::new(&config.analysis)?;
        let bridge = platform_bridge(&config.capture);
        info!(
            endpoint = %analyzer.endpoint(),
            sources = ?config.capture.sources,
            platform = bridge.platform_name(),
            "app services initialised"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                bridge,
                analyzer,
                previews: PreviewRegistry::new(),
                config,
            }),
        })
    }

    pub fn bridge(&self) -> Arc<dyn PlatformBridge> {
        Arc::clone(&self.inner.bridge)
    }

    pub fn platform_name(&self) -> &str {
        self.inner.bridge.platform_name()
    }

    pub fn analyzer(&self) -> AnalysisClient {
        self.inner.analyzer.clone()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.inner.previews
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}

/// Read `config.json` from `data_dir`. A missing file gives the defaults; an
/// unreadable or invalid one is logged and also gives the defaults.
fn load_config(data_dir: &Path) -> AppConfig {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return AppConfig::default();
    }
    match AppConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring configuration file");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use mediscan_core::types::CaptureSources;

    use super::*;

    #[test]
    fn missing_config_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.analysis.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"analysis": {"base_url": "http://10.0.0.2:8080"}, "capture": {"sources": "upload"}}"#,
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.analysis.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.capture.sources, CaptureSources::Upload);
    }

    #[test]
    fn invalid_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"analysis": {"base_url": "ftp://nope"}}"#,
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.analysis.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn services_share_state_across_clones() {
        let svc = AppServices::with_config(AppConfig::default()).unwrap();
        let other = svc.clone();
        assert!(svc == other);
        assert_eq!(svc.analyzer().endpoint().as_str(), "http://127.0.0.1:5000/api/analyze");
        assert_eq!(svc.platform_name(), other.platform_name());
    }
}
