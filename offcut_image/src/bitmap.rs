// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU pixel buffers with shared storage and windowed addressing.

use alloc::vec;
use alloc::vec::Vec;

use peniko::{Blob, ImageData};

use crate::color::ColorInfo;
use crate::geom::{IRect, ISize};

/// A raw CPU pixel buffer.
///
/// Pixel storage is a [`Blob`]: atomically shared and immutable, so cloning
/// a bitmap or narrowing it via [`Bitmap::subset_view`] never copies pixels.
/// The bitmap addresses a `width x height` window into the blob starting at
/// `offset`, with rows `row_bytes` apart; the window need not start at the
/// blob's beginning nor have tight rows.
#[derive(Clone, Debug)]
pub struct Bitmap {
    data: Blob<u8>,
    offset: usize,
    row_bytes: usize,
    width: i32,
    height: i32,
    color_info: ColorInfo,
}

impl Bitmap {
    /// Allocate a zeroed bitmap with tight rows.
    ///
    /// Returns `None` for empty dimensions, unsized (encoded) formats, or
    /// when the byte size overflows. These are the recoverable allocation
    /// failures surfaced by [`crate::as_bitmap`].
    pub fn alloc(width: i32, height: i32, color_info: ColorInfo) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let bpp = color_info.bytes_per_pixel();
        if bpp == 0 {
            return None;
        }
        let row_bytes = (width as usize).checked_mul(bpp)?;
        let total = row_bytes.checked_mul(height as usize)?;
        let pixels: Vec<u8> = vec![0; total];
        Some(Self {
            data: Blob::from(pixels),
            offset: 0,
            row_bytes,
            width,
            height,
            color_info,
        })
    }

    /// Wrap caller-supplied pixel storage without copying.
    ///
    /// The blob must hold at least `(height - 1) * row_bytes + width * bpp`
    /// bytes; returns `None` otherwise, or for empty dimensions, unsized
    /// formats, or rows tighter than a pixel row.
    pub fn from_pixels(
        data: Blob<u8>,
        width: i32,
        height: i32,
        row_bytes: usize,
        color_info: ColorInfo,
    ) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let bpp = color_info.bytes_per_pixel();
        if bpp == 0 {
            return None;
        }
        let min_row = (width as usize).checked_mul(bpp)?;
        if row_bytes < min_row {
            return None;
        }
        let needed = (height as usize - 1)
            .checked_mul(row_bytes)?
            .checked_add(min_row)?;
        if data.data().len() < needed {
            return None;
        }
        Some(Self {
            data,
            offset: 0,
            row_bytes,
            width,
            height,
            color_info,
        })
    }

    /// Width of the addressed window in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the addressed window in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Extents of the addressed window.
    #[inline]
    pub fn dimensions(&self) -> ISize {
        ISize::new(self.width, self.height)
    }

    /// The window's bounds as a rectangle at the origin.
    #[inline]
    pub fn bounds(&self) -> IRect {
        IRect::from_size(self.dimensions())
    }

    /// Color info of the pixels.
    #[inline]
    pub fn color_info(&self) -> &ColorInfo {
        &self.color_info
    }

    /// Distance in bytes between the starts of consecutive rows.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Byte footprint of the whole backing allocation.
    ///
    /// This is the blob's full length, not the window's area; memory
    /// budgeting accounts for the allocation, not the logical view.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.data().len()
    }

    /// Identity of the backing storage.
    ///
    /// Two bitmaps with equal storage ids alias the same allocation. This is
    /// how zero-copy sharing vs deep copying is observable without mutation.
    #[inline]
    pub fn storage_id(&self) -> u64 {
        self.data.id()
    }

    /// The pixels of row `y` within the window, tightly `width * bpp` long.
    ///
    /// Panics if `y` is outside the window; row addressing is an internal
    /// pipeline invariant, not an input-validation point.
    pub fn row(&self, y: i32) -> &[u8] {
        assert!(y >= 0 && y < self.height, "row index outside bitmap window");
        let bpp = self.color_info.bytes_per_pixel();
        let start = self.offset + y as usize * self.row_bytes;
        &self.data.data()[start..start + self.width as usize * bpp]
    }

    /// Read one pixel as raw bytes.
    ///
    /// Panics if `(x, y)` is outside the window.
    pub fn read_pixel(&self, x: i32, y: i32) -> [u8; 4] {
        assert!(x >= 0 && x < self.width, "pixel x outside bitmap window");
        let bpp = self.color_info.bytes_per_pixel();
        let row = self.row(y);
        let start = x as usize * bpp;
        let mut out = [0; 4];
        out[..bpp].copy_from_slice(&row[start..start + bpp]);
        out
    }

    /// Narrow the window to `rect` (in this bitmap's coordinates) without
    /// copying. Returns `None` if `rect` is empty or escapes the window.
    pub fn subset_view(&self, rect: IRect) -> Option<Self> {
        if rect.is_empty() || !self.bounds().contains_rect(rect) {
            return None;
        }
        let bpp = self.color_info.bytes_per_pixel();
        let offset = self.offset + rect.y0 as usize * self.row_bytes + rect.x0 as usize * bpp;
        Some(Self {
            data: self.data.clone(),
            offset,
            row_bytes: self.row_bytes,
            width: rect.width(),
            height: rect.height(),
            color_info: self.color_info,
        })
    }

    /// Copy the pixels of `rect` into a new, tight, independent allocation.
    ///
    /// Returns `None` if `rect` is empty or escapes the window.
    pub fn copy_subset(&self, rect: IRect) -> Option<Self> {
        if rect.is_empty() || !self.bounds().contains_rect(rect) {
            return None;
        }
        let bpp = self.color_info.bytes_per_pixel();
        let tight_row = rect.width() as usize * bpp;
        let mut pixels = Vec::with_capacity(tight_row * rect.height() as usize);
        for y in rect.y0..rect.y1 {
            let row = self.row(y);
            pixels.extend_from_slice(&row[rect.x0 as usize * bpp..rect.x1 as usize * bpp]);
        }
        Some(Self {
            data: Blob::from(pixels),
            offset: 0,
            row_bytes: tight_row,
            width: rect.width(),
            height: rect.height(),
            color_info: self.color_info,
        })
    }

    /// Materialize as a peniko [`ImageData`] sharing the same blob.
    ///
    /// Only possible when the window covers the whole blob with tight rows;
    /// windowed views return `None` (peniko image data has no stride).
    pub fn to_image_data(&self) -> Option<ImageData> {
        let bpp = self.color_info.bytes_per_pixel();
        let tight = self.width as usize * bpp;
        if self.offset != 0 || self.row_bytes != tight {
            return None;
        }
        if self.data.data().len() != tight * self.height as usize {
            return None;
        }
        Some(ImageData {
            data: self.data.clone(),
            format: self.color_info.format,
            alpha_type: self.color_info.alpha_type,
            width: self.width as u32,
            height: self.height as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_bitmap(width: i32, height: i32) -> Bitmap {
        let info = ColorInfo::default();
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        Bitmap::from_pixels(Blob::from(pixels), width, height, width as usize * 4, info)
            .expect("valid gradient bitmap")
    }

    #[test]
    fn alloc_rejects_bad_requests() {
        let info = ColorInfo::default();
        assert!(Bitmap::alloc(0, 10, info).is_none());
        assert!(Bitmap::alloc(10, -1, info).is_none());
        assert!(Bitmap::alloc(16, 16, info).is_some());
    }

    #[test]
    fn from_pixels_validates_length() {
        let info = ColorInfo::default();
        let blob = Blob::from(vec![0_u8; 4 * 4 * 4]);
        assert!(Bitmap::from_pixels(blob.clone(), 4, 4, 16, info).is_some());
        assert!(Bitmap::from_pixels(blob.clone(), 4, 5, 16, info).is_none());
        // Rows tighter than a pixel row are rejected.
        assert!(Bitmap::from_pixels(blob, 4, 4, 12, info).is_none());
    }

    #[test]
    fn subset_view_shares_storage() {
        let bm = gradient_bitmap(32, 32);
        let view = bm
            .subset_view(IRect::from_origin_size(5, 7, 8, 8))
            .expect("in-bounds view");
        assert_eq!(view.dimensions(), ISize::new(8, 8));
        assert_eq!(view.storage_id(), bm.storage_id());
        // The view's backing footprint is still the full allocation.
        assert_eq!(view.byte_size(), bm.byte_size());
        assert_eq!(view.read_pixel(0, 0), bm.read_pixel(5, 7));
        assert_eq!(view.read_pixel(7, 7), bm.read_pixel(12, 14));
    }

    #[test]
    fn subset_view_rejects_escaping_rects() {
        let bm = gradient_bitmap(16, 16);
        assert!(bm.subset_view(IRect::from_origin_size(10, 10, 8, 8)).is_none());
        assert!(bm.subset_view(IRect::from_origin_size(-1, 0, 4, 4)).is_none());
        assert!(bm.subset_view(IRect::from_origin_size(2, 2, 0, 4)).is_none());
    }

    #[test]
    fn copy_subset_is_tight_and_independent() {
        let bm = gradient_bitmap(32, 32);
        let copy = bm
            .copy_subset(IRect::from_origin_size(3, 4, 6, 5))
            .expect("in-bounds copy");
        assert_ne!(copy.storage_id(), bm.storage_id());
        assert_eq!(copy.row_bytes(), 6 * 4);
        assert_eq!(copy.byte_size(), 6 * 5 * 4);
        for y in 0..5 {
            for x in 0..6 {
                assert_eq!(copy.read_pixel(x, y), bm.read_pixel(x + 3, y + 4));
            }
        }
    }

    #[test]
    fn image_data_only_for_tight_full_windows() {
        let bm = gradient_bitmap(8, 8);
        let data = bm.to_image_data().expect("tight full window");
        assert_eq!(data.width, 8);
        assert_eq!(data.height, 8);
        assert_eq!(data.data.id(), bm.storage_id());

        let view = bm
            .subset_view(IRect::from_origin_size(1, 1, 4, 4))
            .expect("in-bounds view");
        assert!(view.to_image_data().is_none());
    }
}
