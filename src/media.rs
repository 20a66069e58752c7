// SPDX-License-Identifier: MPL-2.0
//! Image loading and the set of file types the viewer accepts.

use crate::error::{Error, Result};
use exif::{In, Tag};
use iced::widget::image;
use image_rs::metadata::Orientation;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// File extensions accepted by the open dialog and CLI, matched
/// case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "avif", "gif", "bmp"];

/// A decoded image ready for display. The pixels live inside the handle
/// (reference-counted), so clones stay cheap.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            handle: image::Handle::from_rgba(width, height, pixels),
            width,
            height,
        }
    }
}

/// Checks whether a path carries a recognized image extension.
pub fn is_image_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Drops every path that is not a recognized image file, preserving order.
///
/// Dialog results and CLI arguments both pass through here before they are
/// accepted into the file list.
pub fn filter_image_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.into_iter().filter(|path| is_image_file(path)).collect()
}

/// Loads and decodes the image at `path`, honoring any embedded EXIF
/// orientation so photos display upright.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Decode`]
/// when the bytes do not decode as a supported image format.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let bytes = fs::read(path.as_ref()).map_err(|e| Error::Io(e.to_string()))?;

    let mut img =
        image_rs::load_from_memory(&bytes).map_err(|e| Error::Decode(e.to_string()))?;

    if let Some(orientation) = exif_orientation(&bytes) {
        img.apply_orientation(orientation);
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData::from_rgba(width, height, rgba.into_vec()))
}

/// Reads the EXIF orientation tag, if the file carries one worth applying.
fn exif_orientation(bytes: &[u8]) -> Option<Orientation> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let value = exif
        .get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)?;
    let orientation = Orientation::from_exif(u8::try_from(value).ok()?)?;
    if orientation == Orientation::NoTransforms {
        None
    } else {
        Some(orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn recognizes_extensions_case_insensitively() {
        assert!(is_image_file("photo.png"));
        assert!(is_image_file("photo.JPEG"));
        assert!(is_image_file("photo.WebP"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("archive.tar.gz"));
        assert!(!is_image_file("no_extension"));
    }

    #[test]
    fn filter_drops_non_image_paths_preserving_order() {
        let paths = vec![
            PathBuf::from("a.png"),
            PathBuf::from("b.txt"),
            PathBuf::from("c.JPEG"),
        ];
        let filtered = filter_image_paths(paths);
        assert_eq!(
            filtered,
            vec![PathBuf::from("a.png"), PathBuf::from("c.JPEG")]
        );
    }

    #[test]
    fn load_png_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("sample.png");

        let image = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        image
            .save(&image_path)
            .expect("failed to write temporary png");

        let data = load_image(&image_path).expect("png should load successfully");
        assert_eq!(data.width, 4);
        assert_eq!(data.height, 2);
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing_path = temp_dir.path().join("does_not_exist.png");

        match load_image(&missing_path) {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_invalid_bytes_returns_decode_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let bad_path = temp_dir.path().join("invalid.png");
        fs::write(&bad_path, b"not a png").expect("failed to write invalid data");

        match load_image(&bad_path) {
            Err(Error::Decode(message)) => assert!(!message.is_empty()),
            other => panic!("expected Decode error for invalid png, got {other:?}"),
        }
    }

    #[test]
    fn exif_orientation_absent_for_plain_png() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image_rs::ImageFormat::Png)
            .expect("encode png");
        assert!(exif_orientation(&bytes).is_none());
    }
}
