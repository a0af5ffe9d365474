// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color information and surface properties carried by every special image.

use peniko::color::ColorSpaceTag;
use peniko::{ImageAlphaType, ImageFormat};

/// Pixel format, alpha handling, and color space of an image.
///
/// This is an immutable value that travels with the image regardless of
/// whether the backing store is CPU or GPU resident.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorInfo {
    /// Pixel format of the backing store.
    pub format: ImageFormat,
    /// Alpha encoding of the pixels (straight vs premultiplied).
    pub alpha_type: ImageAlphaType,
    /// Color space the pixel values are expressed in.
    pub color_space: ColorSpaceTag,
}

impl ColorInfo {
    /// Create a new color info value.
    #[inline]
    pub const fn new(
        format: ImageFormat,
        alpha_type: ImageAlphaType,
        color_space: ColorSpaceTag,
    ) -> Self {
        Self {
            format,
            alpha_type,
            color_space,
        }
    }

    /// Bytes per pixel for raw formats.
    ///
    /// Returns 0 for encoded or unknown formats, which makes them unusable
    /// as backing stores: bitmap allocation over such an info fails
    /// recoverably rather than misaddressing rows.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            ImageFormat::Rgba8 | ImageFormat::Bgra8 => 4,
            _ => 0,
        }
    }
}

impl Default for ColorInfo {
    /// Premultiplied sRGB `Rgba8`, the pipeline's working configuration.
    fn default() -> Self {
        Self::new(
            ImageFormat::Rgba8,
            ImageAlphaType::AlphaPremultiplied,
            ColorSpaceTag::Srgb,
        )
    }
}

/// Subpixel layout of the destination surface.
///
/// A rendering hint only; it never affects subset arithmetic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PixelGeometry {
    /// Layout unknown; subpixel rendering should not be used.
    #[default]
    Unknown,
    /// Horizontal RGB stripes.
    RgbHorizontal,
    /// Horizontal BGR stripes.
    BgrHorizontal,
    /// Vertical RGB stripes.
    RgbVertical,
    /// Vertical BGR stripes.
    BgrVertical,
}

/// Rendering hints passed through to drawing, immutable per image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceProps {
    /// Subpixel layout of the destination surface.
    pub pixel_geometry: PixelGeometry,
    /// Prefer device-independent font metrics when rendering text into
    /// surfaces carrying these props.
    pub use_device_independent_fonts: bool,
}

impl SurfaceProps {
    /// Create surface props with the given pixel geometry.
    #[inline]
    pub const fn new(pixel_geometry: PixelGeometry) -> Self {
        Self {
            pixel_geometry,
            use_device_independent_fonts: false,
        }
    }
}
