// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Materialized views, shader descriptions, and the collaborator traits the
//! special-image contract delegates to.

use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use kurbo::Affine;
use peniko::{BlendMode, Extend, ImageSampler};

use crate::bitmap::Bitmap;
use crate::color::ColorInfo;
use crate::geom::{ISize, RectF};

/// Opaque handle to a GPU recording context.
///
/// The core only carries this across; GPU-aware consumers downcast via
/// [`RecordingContext::as_any`] to reach the concrete backend context.
pub trait RecordingContext: fmt::Debug + Send + Sync {
    /// The concrete context for downcasting by backend-aware consumers.
    fn as_any(&self) -> &dyn Any;
}

/// A GPU texture handle materialized from a special image.
///
/// The handle is type-erased; only the backend that produced it can
/// interpret it. Cloning shares the underlying texture reference.
#[derive(Clone)]
pub struct TextureView {
    /// Backend-specific texture handle, shared with the backing store.
    pub texture: Arc<dyn Any + Send + Sync>,
    /// Physical extents of the texture.
    pub dimensions: ISize,
    /// Color info of the texel data.
    pub color_info: ColorInfo,
}

impl fmt::Debug for TextureView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureView")
            .field("dimensions", &self.dimensions)
            .field("color_info", &self.color_info)
            .finish_non_exhaustive()
    }
}

/// General-purpose, zero-copy view of a special image's backing store.
///
/// Produced by [`crate::SpecialImage::as_image`]; pure materialization with
/// no transform. The view covers the **physical** backing store, which may
/// be larger than the image's subset window.
#[derive(Clone, Debug)]
pub enum ImageView {
    /// CPU pixels, sharing the backing blob.
    Raster(Bitmap),
    /// GPU texture, sharing the backing handle.
    Texture(TextureView),
}

impl ImageView {
    /// Physical extents of the backing store.
    #[inline]
    pub fn dimensions(&self) -> ISize {
        match self {
            Self::Raster(bitmap) => bitmap.dimensions(),
            Self::Texture(texture) => texture.dimensions,
        }
    }

    /// Color info of the backing store.
    #[inline]
    pub fn color_info(&self) -> &ColorInfo {
        match self {
            Self::Raster(bitmap) => bitmap.color_info(),
            Self::Texture(texture) => &texture.color_info,
        }
    }
}

/// How samples outside an image's bounds are resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TileMode {
    /// Clamp to the nearest edge texel.
    #[default]
    Clamp,
    /// Wrap around to the opposite edge.
    Repeat,
    /// Reflect off the edge.
    Mirror,
    /// Transparent black outside the bounds.
    Decal,
}

impl TileMode {
    /// The peniko extend mode equivalent, if one exists.
    ///
    /// [`TileMode::Decal`] has no extend-mode counterpart; samplers that
    /// need it must encode transparent-black borders themselves.
    #[inline]
    pub const fn to_extend(self) -> Option<Extend> {
        match self {
            Self::Clamp => Some(Extend::Pad),
            Self::Repeat => Some(Extend::Repeat),
            Self::Mirror => Some(Extend::Reflect),
            Self::Decal => None,
        }
    }
}

/// A shader description sampling a special image.
///
/// Plain data consumed by the (external) sampling implementation. The two
/// variants carry the strict/fast distinction of the contract: `Subset`
/// pins out-of-window access to a tile mode, `Direct` skips the bounds
/// machinery entirely.
#[derive(Clone, Debug)]
pub enum Shader {
    /// Samples `image` through the `subset` window; any access outside the
    /// window is resolved by `tile_mode`.
    Subset {
        /// Backing store to sample from.
        image: ImageView,
        /// Sampling window in the backing store's coordinate frame.
        subset: RectF,
        /// Resolution of out-of-window samples.
        tile_mode: TileMode,
        /// Filtering parameters.
        sampling: ImageSampler,
        /// Shader-local transform.
        local_matrix: Affine,
    },
    /// Samples `image` with no window enforcement.
    ///
    /// Behavior is undefined (not merely suboptimal) if evaluated at
    /// coordinates outside the originating image's subset.
    Direct {
        /// Backing store to sample from.
        image: ImageView,
        /// Resolution of out-of-bounds samples against the physical store.
        tile_mode: TileMode,
        /// Filtering parameters.
        sampling: ImageSampler,
        /// Shader-local transform.
        local_matrix: Affine,
    },
}

impl Shader {
    /// The backing store this shader samples from.
    #[inline]
    pub fn image(&self) -> &ImageView {
        match self {
            Self::Subset { image, .. } | Self::Direct { image, .. } => image,
        }
    }

    /// The shader-local transform.
    #[inline]
    pub fn local_matrix(&self) -> Affine {
        match self {
            Self::Subset { local_matrix, .. } | Self::Direct { local_matrix, .. } => *local_matrix,
        }
    }

    /// The filtering parameters.
    #[inline]
    pub fn sampling(&self) -> ImageSampler {
        match self {
            Self::Subset { sampling, .. } | Self::Direct { sampling, .. } => *sampling,
        }
    }
}

/// Compositing controls for [`Canvas::draw_image_rect`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Paint {
    /// Blend mode used to composite onto the destination.
    pub blend: BlendMode,
    /// Uniform opacity in `[0, 1]` applied on top of the image's alpha.
    pub alpha: f32,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            blend: BlendMode::default(),
            alpha: 1.0,
        }
    }
}

/// Whether sampling may read outside the source rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SrcRectConstraint {
    /// Filtering must not read texels outside the source rectangle.
    Strict,
    /// Filtering may read neighboring texels; the caller asserts the bleed
    /// is harmless (e.g. unscaled draws with no filtering margin).
    Fast,
}

/// Destination sink for composited image subsets.
///
/// This is the drawing engine's doorway into the pipeline; the engine
/// itself (clipping, transforms, rasterization) is an opaque collaborator.
pub trait Canvas {
    /// Composite the `src` window of `image` into `dst`, filtered by
    /// `sampling` and composited via `paint` (source-over when `None`).
    ///
    /// `constraint` carries the strict/fast sampling promise: under
    /// [`SrcRectConstraint::Strict`] the implementation must not read
    /// texels outside `src`.
    fn draw_image_rect(
        &mut self,
        image: &ImageView,
        src: RectF,
        dst: RectF,
        sampling: ImageSampler,
        paint: Option<&Paint>,
        constraint: SrcRectConstraint,
    );
}
