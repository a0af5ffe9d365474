// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ganesh (GPU) texture backing for the offcut special-image contract.
//!
//! The texture and recording-context types here are handles: texture
//! contents, submission, and lifetime management live in the GPU layer
//! this crate fronts. What this crate owns is the contract behavior —
//! subset windows over a texture that may be larger than the logical
//! bounds, zero-copy narrowing, and Ganesh introspection
//! ([`SpecialImage::is_ganesh_backed`], [`SpecialImage::recording_context`]).

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use core::any::Any;
use core::sync::atomic::{AtomicU32, Ordering};

use offcut_image::{
    ColorInfo, IRect, ISize, ImageView, RecordingContext, SpecialImage, SurfaceProps, TextureView,
    ViewInfo,
};
use peniko::ImageFormat;

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque Ganesh recording context.
///
/// A token identifying the GPU recording stream a texture belongs to.
/// Downstream consumers reach it through
/// [`SpecialImage::recording_context`] and downcast via
/// [`RecordingContext::as_any`] to pick GPU fast paths.
#[derive(Debug)]
pub struct GaneshContext {
    id: u32,
}

impl GaneshContext {
    /// Create a new context token.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Identity of this context.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl RecordingContext for GaneshContext {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Handle to a Ganesh texture allocation.
///
/// The physical extents may exceed any image's logical bounds; filter
/// pipelines allocate oversized intermediates and re-window them.
#[derive(Debug)]
pub struct GaneshTexture {
    dimensions: ISize,
    format: ImageFormat,
    byte_size: usize,
}

impl GaneshTexture {
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

/// Ganesh texture-backed special image.
#[derive(Debug)]
struct GaneshImage {
    info: ViewInfo,
    context: Arc<GaneshContext>,
    texture: Arc<GaneshTexture>,
}

impl SpecialImage for GaneshImage {
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
            context: self.context.clone(),
            texture: self.texture.clone(),
        }))
    }

    fn is_ganesh_backed(&self) -> bool {
        true
    }

    fn recording_context(&self) -> Option<&dyn RecordingContext> {
        Some(self.context.as_ref())
    }
}

/// Wrap a Ganesh texture as a special image.
///
/// `subset` is in the texture's coordinate frame and must lie within its
/// physical bounds; returns `None` otherwise, or when the texture's format
/// disagrees with `color_info`. `unique_id` may be
/// [`offcut_image::NEED_NEW_UNIQUE_ID`] to request a fresh identity.
pub fn make_from_texture(
    context: &Arc<GaneshContext>,
    subset: IRect,
    unique_id: u32,
    color_info: ColorInfo,
    props: SurfaceProps,
    texture: Arc<GaneshTexture>,
) -> Option<Arc<dyn SpecialImage>> {
    if !IRect::from_size(texture.dimensions()).contains_rect(subset) {
        return None;
    }
    if texture.format() != color_info.format {
        return None;
    }
    Some(Arc::new(GaneshImage {
        info: ViewInfo::new(subset, unique_id, color_info, props),
        context: context.clone(),
        texture,
    }))
}
