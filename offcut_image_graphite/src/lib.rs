// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphite (GPU) texture backing for the offcut special-image contract.
//!
//! Structurally the sibling of `offcut_image_ganesh`, with two deliberate
//! differences: images record against a [`GraphiteRecorder`] rather than a
//! recording context, and [`SpecialImage::recording_context`] stays `None` —
//! the recording-context accessor is a Ganesh-only surface, and Graphite
//! consumers route through their recorder instead.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use offcut_image::{
    ColorInfo, IRect, ISize, ImageView, SpecialImage, SurfaceProps, TextureView, ViewInfo,
};
use peniko::ImageFormat;

static NEXT_RECORDER_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque Graphite recorder token.
///
/// Identifies the recording stream a texture belongs to. Unlike the Ganesh
/// context, it is not surfaced through the special-image contract; callers
/// that need it keep their own handle.
#[derive(Debug)]
pub struct GraphiteRecorder {
    id: u32,
}

impl GraphiteRecorder {
    /// Create a new recorder token.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_RECORDER_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Identity of this recorder.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Handle to a Graphite texture allocation.
///
/// The physical extents may exceed any image's logical bounds; filter
/// pipelines allocate oversized intermediates and re-window them.
#[derive(Debug)]
pub struct GraphiteTexture {
    dimensions: ISize,
    format: ImageFormat,
    byte_size: usize,
}

impl GraphiteTexture {
    /// Describe a texture allocation.
    ///
    /// Returns `None` for empty dimensions or unsized formats.
    pub fn new(dimensions: ISize, format: ImageFormat) -> Option<Arc<Self>> {
        if dimensions.is_empty() {
            return None;
        }
        let bpp = match format {
            ImageFormat::Rgba8 | ImageFormat::Bgra8 => 4,
            _ => return None,
        };
        let byte_size = dimensions.area().checked_mul(bpp)?;
        Some(Arc::new(Self {
            dimensions,
            format,
            byte_size,
        }))
    }

    /// Physical extents of the texture.
    #[inline]
    pub fn dimensions(&self) -> ISize {
        self.dimensions
    }

    /// Texel format of the texture.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Byte footprint of the allocation.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }
}

/// Graphite texture-backed special image.
#[derive(Debug)]
struct GraphiteImage {
    info: ViewInfo,
    recorder: Arc<GraphiteRecorder>,
    texture: Arc<GraphiteTexture>,
}

impl SpecialImage for GraphiteImage {
    fn view_info(&self) -> &ViewInfo {
        &self.info
    }

    fn byte_size(&self) -> usize {
        self.texture.byte_size()
    }

    fn as_image(&self) -> ImageView {
        ImageView::Texture(TextureView {
            texture: self.texture.clone(),
            dimensions: self.texture.dimensions(),
            color_info: *self.info.color_info(),
        })
    }

    fn on_make_subset(&self, absolute: IRect) -> Option<Arc<dyn SpecialImage>> {
        if !IRect::from_size(self.texture.dimensions()).contains_rect(absolute) {
            return None;
        }
        Some(Arc::new(Self {
            info: ViewInfo::new(
                absolute,
                offcut_image::NEED_NEW_UNIQUE_ID,
                *self.info.color_info(),
                *self.info.props(),
            ),
            recorder: self.recorder.clone(),
            texture: self.texture.clone(),
        }))
    }

    fn is_graphite_backed(&self) -> bool {
        true
    }
}

/// Wrap a Graphite texture as a special image.
///
/// `subset` is in the texture's coordinate frame and must lie within its
/// physical bounds; returns `None` otherwise, or when the texture's format
/// disagrees with `color_info`. `unique_id` may be
/// [`offcut_image::NEED_NEW_UNIQUE_ID`] to request a fresh identity.
pub fn make_from_texture(
    recorder: &Arc<GraphiteRecorder>,
    subset: IRect,
    unique_id: u32,
    color_info: ColorInfo,
    props: SurfaceProps,
    texture: Arc<GraphiteTexture>,
) -> Option<Arc<dyn SpecialImage>> {
    if !IRect::from_size(texture.dimensions()).contains_rect(subset) {
        return None;
    }
    if texture.format() != color_info.format {
        return None;
    }
    Some(Arc::new(GraphiteImage {
        info: ViewInfo::new(subset, unique_id, color_info, props),
        recorder: recorder.clone(),
        texture,
    }))
}
