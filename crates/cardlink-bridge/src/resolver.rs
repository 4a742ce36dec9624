// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image resolution for host image references.
//
// Hosts hand over `{ uri, width, height, scale }`. Local assets resolve to a
// `file://` URI or a bare path; those are decoded with the `image` crate into
// the RGBA buffer the SDK expects.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use cardlink_core::error::{CardlinkError, Result};
use cardlink_core::types::{ImageReference, PlatformImage};

use crate::traits::ImageResolver;

/// Resolves local image files, optionally relative to an asset root.
#[derive(Debug, Clone, Default)]
pub struct FileImageResolver {
    asset_root: Option<PathBuf>,
}

impl FileImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` (the app bundle directory).
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(root.into()),
        }
    }

    fn local_path(&self, uri: &str) -> Result<PathBuf> {
        let path = if let Some(rest) = uri.strip_prefix("file://") {
            PathBuf::from(rest)
        } else if uri.contains("://") {
            let scheme = uri.split("://").next().unwrap_or_default();
            return Err(CardlinkError::ImageResolution(format!(
                "unsupported image URI scheme `{scheme}`"
            )));
        } else {
            PathBuf::from(uri)
        };

        match &self.asset_root {
            Some(root) if path.is_relative() => Ok(root.join(path)),
            _ => Ok(path),
        }
    }
}

impl ImageResolver for FileImageResolver {
    #[instrument(skip_all, fields(uri = %reference.uri))]
    fn resolve(&self, reference: &ImageReference) -> Result<PlatformImage> {
        let path = self.local_path(&reference.uri)?;
        let rgba = decode(&path)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        if let (Some(w), Some(h)) = (reference.width, reference.height) {
            if (w, h) != (width, height) {
                debug!(
                    declared_width = w,
                    declared_height = h,
                    width,
                    height,
                    "declared image size differs from decoded size"
                );
            }
        }

        Ok(PlatformImage {
            width,
            height,
            scale: reference.scale.unwrap_or(1.0),
            rgba: rgba.into_raw(),
        })
    }
}

fn decode(path: &Path) -> Result<image::DynamicImage> {
    image::open(path).map_err(|err| {
        CardlinkError::ImageResolution(format!("failed to open {}: {}", path.display(), err))
    })
}
