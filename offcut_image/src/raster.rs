// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster (CPU) backing variant and the factory entry/exit points.

use alloc::sync::Arc;

use crate::bitmap::Bitmap;
use crate::color::SurfaceProps;
use crate::geom::IRect;
use crate::image::{NEED_NEW_UNIQUE_ID, SpecialImage, ViewInfo};
use crate::view::ImageView;

/// CPU-backed special image sharing a bitmap's storage.
#[derive(Debug)]
struct RasterImage {
    info: ViewInfo,
    bitmap: Bitmap,
}

impl SpecialImage for RasterImage {
    fn view_info(&self) -> &ViewInfo {
        &self.info
    }

    fn byte_size(&self) -> usize {
        self.bitmap.byte_size()
    }

    fn as_image(&self) -> ImageView {
        ImageView::Raster(self.bitmap.clone())
    }

    fn on_make_subset(&self, absolute: IRect) -> Option<Arc<dyn SpecialImage>> {
        if !self.bitmap.bounds().contains_rect(absolute) {
            return None;
        }
        // Same storage, narrowed window, fresh logical identity.
        Some(Arc::new(Self {
            info: ViewInfo::new(
                absolute,
                NEED_NEW_UNIQUE_ID,
                *self.info.color_info(),
                *self.info.props(),
            ),
            bitmap: self.bitmap.clone(),
        }))
    }
}

/// Wrap existing raster pixel data without copying.
///
/// The resulting image shares ownership of `bitmap`'s pixel storage and
/// exposes `subset` (in the bitmap's coordinate frame) as its content.
/// Returns `None` when `subset` does not lie within the bitmap's bounds.
pub fn make_from_raster(
    subset: IRect,
    bitmap: &Bitmap,
    props: SurfaceProps,
) -> Option<Arc<dyn SpecialImage>> {
    debug_assert!(subset.is_sorted(), "subset has negative extents");
    if !bitmap.bounds().contains_rect(subset) {
        return None;
    }
    Some(Arc::new(RasterImage {
        info: ViewInfo::new(subset, NEED_NEW_UNIQUE_ID, *bitmap.color_info(), props),
        bitmap: bitmap.clone(),
    }))
}

/// Wrap an already-materialized image view without copying.
///
/// The image-flavored counterpart of [`make_from_raster`]: only raster
/// views are accepted — a texture-backed view is not raster data and
/// yields `None`, as does a subset outside the view's bounds.
pub fn make_from_image(
    subset: IRect,
    image: ImageView,
    props: SurfaceProps,
) -> Option<Arc<dyn SpecialImage>> {
    match image {
        ImageView::Raster(bitmap) => make_from_raster(subset, &bitmap, props),
        ImageView::Texture(_) => None,
    }
}

/// Force an independent copy of the pixel data within `subset`.
///
/// Used when the source buffer's lifetime or mutability cannot be trusted
/// to outlive the resulting image. The copy is tight and the new image's
/// subset sits at the origin of its own backing store. Returns `None` when
/// `subset` does not lie within the bitmap's bounds or the copy cannot be
/// allocated.
pub fn copy_from_raster(
    subset: IRect,
    bitmap: &Bitmap,
    props: SurfaceProps,
) -> Option<Arc<dyn SpecialImage>> {
    debug_assert!(subset.is_sorted(), "subset has negative extents");
    let copied = bitmap.copy_subset(subset)?;
    let bounds = copied.bounds();
    Some(Arc::new(RasterImage {
        info: ViewInfo::new(bounds, NEED_NEW_UNIQUE_ID, *copied.color_info(), props),
        bitmap: copied,
    }))
}

/// Extract the pixel contents of an image's subset as a bitmap.
///
/// The exit point back to raw pixels. Succeeds only for CPU-backed images;
/// GPU-backed images have no readback path in this context. On success the
/// bitmap is a zero-copy view whose dimensions equal the image's subset,
/// not the backing store's physical size. On failure nothing is produced.
pub fn as_bitmap(image: &dyn SpecialImage) -> Option<Bitmap> {
    if image.is_ganesh_backed() || image.is_graphite_backed() {
        return None;
    }
    match image.as_image() {
        ImageView::Raster(backing) => backing.subset_view(image.subset()),
        ImageView::Texture(_) => None,
    }
}
