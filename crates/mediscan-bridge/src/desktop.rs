// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge. Files come from the native file dialog; there is no
// camera API, so acquire reports `UnsupportedEnvironment` unless a
// synthetic camera was configured.

use async_trait::async_trait;
use mediscan_core::error::{MediscanError, Result};

use crate::file_input::PickedFile;
use crate::synthetic::SyntheticCamera;
use crate::traits::{CameraConstraints, MediaStream, NativeCamera, NativeFilePicker, PlatformBridge};

/// File extensions offered by the picker's "Images" filter.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "heic"];

pub struct DesktopBridge {
    camera: Option<SyntheticCamera>,
}

impl DesktopBridge {
    pub fn new(camera: Option<SyntheticCamera>) -> Self {
        Self { camera }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        if self.camera.is_some() {
            "Desktop (synthetic camera)"
        } else {
            "Desktop"
        }
    }
}

#[async_trait]
impl NativeCamera for DesktopBridge {
    async fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn MediaStream>> {
        match &self.camera {
            Some(camera) => camera.acquire(constraints).await,
            None => {
                tracing::warn!("NativeCamera::acquire called on desktop bridge without a camera");
                Err(MediscanError::UnsupportedEnvironment)
            }
        }
    }
}

impl NativeFilePicker for DesktopBridge {
    fn pick_image(&self) -> Result<Option<PickedFile>> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            tracing::debug!("file dialog cancelled");
            return Ok(None);
        };
        tracing::info!(path = %path.display(), "file picked");
        PickedFile::from_path(&path).map(Some)
    }
}
