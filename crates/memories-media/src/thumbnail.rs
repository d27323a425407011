//! Thumbnail derivation.
//!
//! Scales an image down so neither side exceeds a fixed bound, keeping the
//! aspect ratio and the source's encoded format. Images already inside the
//! bound are re-encoded at their original size, never enlarged.

use std::path::Path;

use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;

use crate::error::MediaError;

/// Longest side of a stored thumbnail, in pixels.
pub const MAX_DIMENSION: u32 = 300;

/// Dimensions of a written thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
}

/// Largest size with the same aspect ratio that fits inside `max` x `max`.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let (w, h) = (width as u64, height as u64);
    let max = max as u64;
    let scaled = if w >= h {
        (max, (h * max + w / 2) / w)
    } else {
        ((w * max + h / 2) / h, max)
    };
    (scaled.0.max(1) as u32, scaled.1.max(1) as u32)
}

/// Decode `source`, shrink it to fit `max`, and write it to `dest`.
pub fn write_thumbnail(source: &[u8], dest: &Path, max: u32) -> Result<Thumbnail, MediaError> {
    let format = image::guess_format(source).map_err(MediaError::Decode)?;
    let img = image::load_from_memory_with_format(source, format).map_err(MediaError::Decode)?;

    let (orig_w, orig_h) = img.dimensions();
    let (width, height) = fit_within(orig_w, orig_h, max);
    debug!(
        original_width = orig_w,
        original_height = orig_h,
        width,
        height,
        "Writing thumbnail"
    );

    let thumb = if (width, height) == (orig_w, orig_h) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    thumb
        .save_with_format(dest, format)
        .map_err(MediaError::Encode)?;

    Ok(Thumbnail { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn fit_within_landscape() {
        assert_eq!(fit_within(1200, 800, 300), (300, 200));
    }

    #[test]
    fn fit_within_portrait() {
        assert_eq!(fit_within(800, 1200, 300), (200, 300));
    }

    #[test]
    fn fit_within_never_enlarges() {
        assert_eq!(fit_within(120, 40, 300), (120, 40));
        assert_eq!(fit_within(300, 300, 300), (300, 300));
    }

    #[test]
    fn fit_within_keeps_thin_images_visible() {
        assert_eq!(fit_within(10_000, 1, 300), (300, 1));
    }

    #[test]
    fn writes_bounded_thumbnail_in_source_format() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("thumb_wide.png");

        let thumb = write_thumbnail(&png(900, 450), &dest, MAX_DIMENSION).unwrap();
        assert_eq!(thumb, Thumbnail { width: 300, height: 150 });

        let written = image::open(&dest).unwrap();
        assert_eq!(written.dimensions(), (300, 150));
        assert_eq!(
            image::ImageFormat::from_path(&dest).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[test]
    fn rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_thumbnail(b"definitely not an image", &dir.path().join("t"), 300)
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(!dir.path().join("t").exists());
    }
}
