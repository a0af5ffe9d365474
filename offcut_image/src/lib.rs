// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offcut: a restricted, subset-windowed image abstraction for filter
//! pipelines.
//!
//! A special image is not a general-purpose image type. It is the
//! intermediate currency of a filter/compositing pipeline:
//!
//! - it is backed either by CPU pixels ([`Bitmap`]) or by a GPU texture,
//!   never by a lazy generator or decoder;
//! - its backing store may be **larger** than its logical bounds — oversized
//!   intermediate buffers are reused by narrowing the window
//!   ([`SpecialImage::make_subset`]) instead of copying;
//! - it cannot be drawn tiled or sampled through mipmaps.
//!
//! The content of the backing store outside the subset window is undefined
//! and must never be sampled as meaningful data. All public state
//! (subset, unique id, color info, surface props) is immutable after
//! construction; images are shared as `Arc<dyn SpecialImage>`.
//!
//! # Position in the stack
//!
//! - **Pipeline stages** produce and consume special images, composing them
//!   onto a [`Canvas`] or into [`Shader`] graphs.
//! - **This crate** defines the polymorphic contract, the raster backing,
//!   and the factory entry/exit points ([`make_from_raster`],
//!   [`copy_from_raster`], [`as_bitmap`]).
//! - **Backend crates** supply GPU texture backings behind the same
//!   contract (`offcut_image_ganesh`, `offcut_image_graphite`).
//!
//! The rasterizer behind [`Canvas`], the sampling implementation behind
//! [`Shader`], and GPU context/texture lifetime management are opaque
//! collaborators, not part of this crate.
//!
//! # Example
//!
//! ```
//! use offcut_image::{Bitmap, ColorInfo, IRect, SpecialImage, SurfaceProps, make_from_raster};
//!
//! let backing = Bitmap::alloc(200, 200, ColorInfo::default()).unwrap();
//! let subset = IRect::from_origin_size(10, 10, 50, 50);
//! let image = make_from_raster(subset, &backing, SurfaceProps::default()).unwrap();
//!
//! assert_eq!(image.width(), 50);
//! assert_eq!(image.height(), 50);
//! // Narrow the window further; relative to the image's own content rect.
//! let inner = image.make_subset(IRect::from_origin_size(5, 5, 10, 10)).unwrap();
//! assert_eq!(inner.subset().top_left(), offcut_image::IPoint::new(15, 15));
//! ```

#![no_std]

extern crate alloc;

mod bitmap;
mod color;
mod geom;
mod image;
mod raster;
mod view;

pub use bitmap::Bitmap;
pub use color::{ColorInfo, PixelGeometry, SurfaceProps};
pub use geom::{IPoint, IRect, ISize, RectF};
pub use image::{
    NEED_NEW_UNIQUE_ID, SpecialImage, ViewInfo, next_unique_id, resolve_unique_id,
};
pub use raster::{as_bitmap, copy_from_raster, make_from_image, make_from_raster};
pub use view::{
    Canvas, ImageView, Paint, RecordingContext, Shader, SrcRectConstraint, TextureView, TileMode,
};

/// Affine transform type used for shader local matrices.
pub type Affine = kurbo::Affine;

pub use peniko::{BlendMode, Blob, ImageAlphaType, ImageFormat, ImageQuality, ImageSampler};
pub use peniko::color::ColorSpaceTag;
