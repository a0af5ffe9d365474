// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The special-image contract: one polymorphic, subset-aware view over CPU
//! or GPU resident pixel data.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::Affine;
use peniko::color::ColorSpaceTag;
use peniko::{ImageAlphaType, ImageFormat, ImageSampler};

use crate::color::{ColorInfo, SurfaceProps};
use crate::geom::{IRect, ISize, RectF};
use crate::view::{Canvas, ImageView, Paint, RecordingContext, Shader, SrcRectConstraint, TileMode};

/// Sentinel requesting a freshly allocated unique id at construction.
pub const NEED_NEW_UNIQUE_ID: u32 = 0;

static NEXT_UNIQUE_ID: AtomicU32 = AtomicU32::new(1);

/// Allocate a fresh image identity.
///
/// Thread-safe; never returns [`NEED_NEW_UNIQUE_ID`].
pub fn next_unique_id() -> u32 {
    loop {
        let id = NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed);
        if id != NEED_NEW_UNIQUE_ID {
            return id;
        }
    }
}

/// Map the [`NEED_NEW_UNIQUE_ID`] sentinel to a fresh id, passing any other
/// id through unchanged.
#[inline]
pub fn resolve_unique_id(requested: u32) -> u32 {
    if requested == NEED_NEW_UNIQUE_ID {
        next_unique_id()
    } else {
        requested
    }
}

/// Immutable per-image metadata embedded by every backing variant.
///
/// Fixed for the image's entire lifetime: the subset window, logical
/// identity, color info, and surface props never change in place.
#[derive(Clone, Debug)]
pub struct ViewInfo {
    subset: IRect,
    unique_id: u32,
    color_info: ColorInfo,
    props: SurfaceProps,
}

impl ViewInfo {
    /// Create view metadata.
    ///
    /// `unique_id` may be [`NEED_NEW_UNIQUE_ID`] to request a fresh
    /// identity. A subset with negative extents is a programming error and
    /// faults in debug builds.
    pub fn new(subset: IRect, unique_id: u32, color_info: ColorInfo, props: SurfaceProps) -> Self {
        debug_assert!(subset.is_sorted(), "subset has negative extents");
        Self {
            subset,
            unique_id: resolve_unique_id(unique_id),
            color_info,
            props,
        }
    }

    /// The subset window, in the backing store's coordinate frame.
    #[inline]
    pub fn subset(&self) -> IRect {
        self.subset
    }

    /// Logical image identity for caching and invalidation.
    #[inline]
    pub fn unique_id(&self) -> u32 {
        self.unique_id
    }

    /// Color info of the image.
    #[inline]
    pub fn color_info(&self) -> &ColorInfo {
        &self.color_info
    }

    /// Surface properties passed through to drawing.
    #[inline]
    pub fn props(&self) -> &SurfaceProps {
        &self.props
    }
}

/// A restricted image: a subset window onto a CPU or GPU backing store.
///
/// Everything outside the window is undefined and must never be sampled as
/// meaningful data. Implementations own the backing storage; the contract
/// owns the window arithmetic. Images are stateless views after
/// construction — every operation is a read-only query or a derivation
/// producing a new object — and are shared as `Arc<dyn SpecialImage>`.
pub trait SpecialImage: fmt::Debug + Send + Sync {
    /// The immutable view metadata for this image.
    fn view_info(&self) -> &ViewInfo;

    /// Byte footprint of the backing allocation.
    ///
    /// Reports the physical allocation, not the subset area; external
    /// callers use this for memory budgeting and cache accounting.
    fn byte_size(&self) -> usize;

    /// Materialize a general-purpose view of the backing store.
    ///
    /// Zero-copy: the view shares the underlying memory and covers the
    /// physical store, which may be larger than the subset window.
    fn as_image(&self) -> ImageView;

    /// Backing-specific subset hook.
    ///
    /// `absolute` is in the backing store's coordinate frame; the
    /// non-overridden [`SpecialImage::make_subset`] has already translated
    /// it from the content rect. Returns `None` when the rect escapes the
    /// physical backing bounds; the result otherwise shares the backing
    /// storage under a narrowed window.
    fn on_make_subset(&self, absolute: IRect) -> Option<Arc<dyn SpecialImage>>;

    /// Backing-specific shader hook.
    ///
    /// The default derivation preserves the strict/fast distinction:
    /// strict defers to the subset-aware [`Shader::Subset`] constructor,
    /// non-strict samples [`SpecialImage::as_image`] directly with no
    /// subset enforcement. Overrides may pick a faster backing-specific
    /// path but must keep that distinction.
    fn on_as_shader(
        &self,
        tile_mode: TileMode,
        sampling: ImageSampler,
        local_matrix: Affine,
        strict: bool,
    ) -> Shader {
        if strict {
            Shader::Subset {
                image: self.as_image(),
                subset: self.subset().to_rectf(),
                tile_mode,
                sampling,
                local_matrix,
            }
        } else {
            Shader::Direct {
                image: self.as_image(),
                tile_mode,
                sampling,
                local_matrix,
            }
        }
    }

    /// True if backed by a Ganesh GPU texture.
    fn is_ganesh_backed(&self) -> bool {
        false
    }

    /// True if backed by a Graphite GPU texture.
    fn is_graphite_backed(&self) -> bool {
        false
    }

    /// The GPU recording context, when Ganesh texture-backed.
    fn recording_context(&self) -> Option<&dyn RecordingContext> {
        None
    }

    /// The subset window, in the backing store's coordinate frame.
    #[inline]
    fn subset(&self) -> IRect {
        self.view_info().subset()
    }

    /// Logical image identity for caching and invalidation.
    #[inline]
    fn unique_id(&self) -> u32 {
        self.view_info().unique_id()
    }

    /// Color info of the image.
    #[inline]
    fn color_info(&self) -> &ColorInfo {
        self.view_info().color_info()
    }

    /// Alpha encoding of the pixels.
    #[inline]
    fn alpha_type(&self) -> ImageAlphaType {
        self.color_info().alpha_type
    }

    /// Pixel format of the backing store.
    #[inline]
    fn format(&self) -> ImageFormat {
        self.color_info().format
    }

    /// Color space the pixel values are expressed in.
    #[inline]
    fn color_space(&self) -> ColorSpaceTag {
        self.color_info().color_space
    }

    /// Surface properties passed through to drawing.
    #[inline]
    fn props(&self) -> &SurfaceProps {
        self.view_info().props()
    }

    /// Logical width: the subset's extent, never the backing store's.
    #[inline]
    fn width(&self) -> i32 {
        self.subset().width()
    }

    /// Logical height: the subset's extent, never the backing store's.
    #[inline]
    fn height(&self) -> i32 {
        self.subset().height()
    }

    /// Logical extents of the image.
    #[inline]
    fn dimensions(&self) -> ISize {
        self.subset().size()
    }

    /// Extract a narrowed window of this image as a new special image.
    ///
    /// `subset` is **relative to this image's content rect**; it is
    /// translated into the backing store's frame before delegating to
    /// [`SpecialImage::on_make_subset`]. The result shares backing storage
    /// where the backing permits — a view, not a copy — and is `None` when
    /// the absolute rect escapes the physical backing bounds. A rect with
    /// negative extents is a programming error and faults in debug builds.
    fn make_subset(&self, subset: IRect) -> Option<Arc<dyn SpecialImage>> {
        debug_assert!(subset.is_sorted(), "subset has negative extents");
        let absolute = subset.offset_by(self.subset().top_left());
        self.on_make_subset(absolute)
    }

    /// Composite this image's subset region onto `canvas` at `(x, y)`.
    ///
    /// The subset is translated into the backing store's frame; pixels
    /// outside it are never touched. `strict` forbids filtering from
    /// reading beyond subset edges; pass `false` only when no
    /// out-of-subset access can occur (e.g. unscaled, unfiltered draws).
    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        x: f32,
        y: f32,
        sampling: ImageSampler,
        paint: Option<&Paint>,
        strict: bool,
    ) {
        let subset = self.subset();
        let dst = RectF::from_origin_size(x, y, subset.width() as f32, subset.height() as f32);
        let constraint = if strict {
            SrcRectConstraint::Strict
        } else {
            SrcRectConstraint::Fast
        };
        canvas.draw_image_rect(
            &self.as_image(),
            subset.to_rectf(),
            dst,
            sampling,
            paint,
            constraint,
        );
    }

    /// [`SpecialImage::draw`] with default sampling, no paint, strict.
    fn draw_at(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        self.draw(canvas, x, y, ImageSampler::default(), None, true);
    }

    /// A shader sampling the subset region, with `tile_mode` defining any
    /// access outside subset bounds.
    fn as_shader(&self, tile_mode: TileMode, sampling: ImageSampler, local_matrix: Affine) -> Shader {
        self.on_as_shader(tile_mode, sampling, local_matrix, true)
    }

    /// A shader assuming the caller never samples outside the subset.
    ///
    /// Free to skip the bounds-enforcement machinery [`SpecialImage::as_shader`]
    /// requires; behavior is undefined if the assumption is violated.
    fn as_shader_fast(&self, sampling: ImageSampler, local_matrix: Affine) -> Shader {
        self.on_as_shader(TileMode::Clamp, sampling, local_matrix, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::geom::IPoint;
    use alloc::vec::Vec;

    /// Minimal CPU-backed stand-in exercising the provided contract
    /// methods without pulling in the raster factories.
    #[derive(Debug)]
    struct StubImage {
        info: ViewInfo,
        backing: Bitmap,
    }

    impl StubImage {
        fn new(physical: ISize, subset: IRect) -> Self {
            let backing = Bitmap::alloc(physical.width, physical.height, ColorInfo::default())
                .expect("stub backing");
            Self {
                info: ViewInfo::new(
                    subset,
                    NEED_NEW_UNIQUE_ID,
                    *backing.color_info(),
                    SurfaceProps::default(),
                ),
                backing,
            }
        }
    }

    impl SpecialImage for StubImage {
        fn view_info(&self) -> &ViewInfo {
            &self.info
        }

        fn byte_size(&self) -> usize {
            self.backing.byte_size()
        }

        fn as_image(&self) -> ImageView {
            ImageView::Raster(self.backing.clone())
        }

        fn on_make_subset(&self, absolute: IRect) -> Option<Arc<dyn SpecialImage>> {
            if !self.backing.bounds().contains_rect(absolute) {
                return None;
            }
            Some(Arc::new(Self {
                info: ViewInfo::new(
                    absolute,
                    NEED_NEW_UNIQUE_ID,
                    *self.info.color_info(),
                    *self.info.props(),
                ),
                backing: self.backing.clone(),
            }))
        }
    }

    struct DrawCall {
        src: RectF,
        dst: RectF,
        constraint: SrcRectConstraint,
        had_paint: bool,
    }

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<DrawCall>,
    }

    impl Canvas for RecordingCanvas {
        fn draw_image_rect(
            &mut self,
            _image: &ImageView,
            src: RectF,
            dst: RectF,
            _sampling: ImageSampler,
            paint: Option<&Paint>,
            constraint: SrcRectConstraint,
        ) {
            self.calls.push(DrawCall {
                src,
                dst,
                constraint,
                had_paint: paint.is_some(),
            });
        }
    }

    #[test]
    fn dimensions_come_from_subset_not_backing() {
        let img = StubImage::new(ISize::new(200, 200), IRect::from_origin_size(10, 10, 50, 50));
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 50);
        assert_eq!(img.dimensions(), ISize::new(50, 50));
    }

    #[test]
    fn unique_ids_are_fresh_and_never_sentinel() {
        let a = StubImage::new(ISize::new(8, 8), IRect::from_size(ISize::new(8, 8)));
        let b = StubImage::new(ISize::new(8, 8), IRect::from_size(ISize::new(8, 8)));
        assert_ne!(a.unique_id(), NEED_NEW_UNIQUE_ID);
        assert_ne!(a.unique_id(), b.unique_id());
        assert_eq!(resolve_unique_id(7), 7);
    }

    #[test]
    fn make_subset_translates_relative_coordinates() {
        let img = StubImage::new(ISize::new(200, 200), IRect::from_origin_size(10, 10, 50, 50));
        let sub = img
            .make_subset(IRect::from_origin_size(5, 5, 10, 10))
            .expect("in-bounds subset");
        assert_eq!(sub.subset().top_left(), IPoint::new(15, 15));
        assert_eq!(sub.dimensions(), ISize::new(10, 10));
    }

    #[test]
    fn make_subset_composition_is_associative() {
        let img = StubImage::new(ISize::new(200, 200), IRect::from_origin_size(10, 10, 100, 100));
        let a = IRect::from_origin_size(20, 30, 40, 40);
        let b = IRect::from_origin_size(5, 10, 8, 8);

        let nested = img
            .make_subset(a)
            .expect("first narrowing")
            .make_subset(b)
            .expect("second narrowing");
        let composed = img
            .make_subset(b.offset_by(a.top_left()))
            .expect("composed narrowing");
        assert_eq!(nested.subset(), composed.subset());
    }

    #[test]
    fn make_subset_rejects_escaping_rects() {
        let img = StubImage::new(ISize::new(64, 64), IRect::from_origin_size(32, 32, 32, 32));
        // Relative rect that pushes the absolute window past the backing.
        assert!(img.make_subset(IRect::from_origin_size(16, 16, 32, 32)).is_none());
    }

    #[test]
    fn draw_translates_subset_into_backing_frame() {
        let img = StubImage::new(ISize::new(200, 200), IRect::from_origin_size(10, 10, 50, 50));
        let mut canvas = RecordingCanvas::default();
        img.draw_at(&mut canvas, 0.0, 0.0);

        let call = canvas.calls.first().expect("one draw call");
        assert_eq!(call.src, RectF::new(10.0, 10.0, 60.0, 60.0));
        assert_eq!(call.dst, RectF::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(call.constraint, SrcRectConstraint::Strict);
        assert!(!call.had_paint);
    }

    #[test]
    fn draw_non_strict_relaxes_the_constraint() {
        let img = StubImage::new(ISize::new(64, 64), IRect::from_origin_size(4, 4, 16, 16));
        let mut canvas = RecordingCanvas::default();
        let paint = Paint::default();
        img.draw(
            &mut canvas,
            8.0,
            2.0,
            ImageSampler::default(),
            Some(&paint),
            false,
        );

        let call = canvas.calls.first().expect("one draw call");
        assert_eq!(call.dst, RectF::new(8.0, 2.0, 24.0, 18.0));
        assert_eq!(call.constraint, SrcRectConstraint::Fast);
        assert!(call.had_paint);
    }

    #[test]
    fn default_shader_derivation_keeps_strict_distinction() {
        let img = StubImage::new(ISize::new(64, 64), IRect::from_origin_size(4, 4, 16, 16));
        let lm = Affine::translate((3.0, -1.0));

        let strict = img.as_shader(TileMode::Repeat, ImageSampler::default(), lm);
        let Shader::Subset { subset, tile_mode, .. } = &strict else {
            panic!("strict path must produce a subset-aware shader");
        };
        assert_eq!(*subset, RectF::new(4.0, 4.0, 20.0, 20.0));
        assert_eq!(*tile_mode, TileMode::Repeat);

        let fast = img.as_shader_fast(ImageSampler::default(), lm);
        assert!(matches!(fast, Shader::Direct { .. }));
        assert_eq!(fast.local_matrix(), strict.local_matrix());
    }

    #[test]
    fn introspection_defaults_to_cpu_backed() {
        let img = StubImage::new(ISize::new(8, 8), IRect::from_size(ISize::new(8, 8)));
        assert!(!img.is_ganesh_backed());
        assert!(!img.is_graphite_backed());
        assert!(img.recording_context().is_none());
    }
}
