//! Saving rendered images to disk

use std::fs;
use std::path::Path;

use image::RgbImage;
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("failed to create output directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to encode or write image: {0}")]
    Write(#[from] image::ImageError),
}

/// Save an image, creating missing parent directories.
///
/// The encoding is chosen by the image crate from the file extension.
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<(), ImageIoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ImageIoError::CreateDir)?;
        }
    }

    image.save(path)?;
    info!(
        "saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/field.png");

        let image = RgbImage::new(8, 8);
        save_image(&image, &path).unwrap();

        assert!(path.exists());
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (8, 8));
    }

    #[test]
    fn test_save_roundtrips_pixel_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("field.png");

        let mut image = RgbImage::new(4, 4);
        image.put_pixel(2, 1, image::Rgb([200, 100, 50]));
        save_image(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.get_pixel(2, 1), &image::Rgb([200, 100, 50]));
    }
}
