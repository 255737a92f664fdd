//! Reference image loading and encoding.

use std::fs;
use std::path::{Path, PathBuf};

use analysis::EncodedImage;
use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use crate::error::{Result, SrefkitError};

/// MIME type for a path, judged by extension.
pub fn mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Whether the path names a supported image format.
pub fn is_valid_image(path: &Path) -> bool {
    mime_type(path).is_some()
}

/// Read one image file and encode it for a backend.
pub fn encode_image(path: &Path) -> Result<EncodedImage> {
    let media_type = mime_type(path).ok_or_else(|| {
        SrefkitError::Image(format!("Unsupported image format: {}", path.display()))
    })?;

    let bytes = fs::read(path)
        .map_err(|e| SrefkitError::Image(format!("Failed to read {}: {e}", path.display())))?;

    Ok(EncodedImage::new(
        general_purpose::STANDARD.encode(&bytes),
        media_type,
    ))
}

/// Collect the supported images among the given paths, descending one level
/// into directories. Paths come back sorted so runs are reproducible.
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && is_valid_image(&path) {
                    found.push(path);
                }
            }
        } else if is_valid_image(input) {
            found.push(input.clone());
        } else {
            return Err(SrefkitError::Image(format!(
                "Unsupported image format: {}",
                input.display()
            )));
        }
    }

    found.sort();
    debug!(count = found.len(), "collected reference images");

    if found.is_empty() {
        return Err(SrefkitError::Image(
            "No supported images found in the given paths".to_string(),
        ));
    }

    Ok(found)
}

/// Encode every collected image, preserving order.
pub fn encode_all(paths: &[PathBuf]) -> Result<Vec<EncodedImage>> {
    paths.iter().map(|path| encode_image(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("test.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type(Path::new("test.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_type(Path::new("test.png")), Some("image/png"));
        assert_eq!(mime_type(Path::new("test.webp")), Some("image/webp"));
        assert_eq!(mime_type(Path::new("test.txt")), None);
        assert_eq!(mime_type(Path::new("noext")), None);
    }

    #[test]
    fn encode_produces_base64_with_media_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ref.png");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let encoded = encode_image(&path).unwrap();
        assert_eq!(encoded.media_type, "image/png");
        assert_eq!(encoded.data, "iVBORw==");
    }

    #[test]
    fn collect_walks_directories_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.jpg", "a.png", "notes.txt"] {
            fs::write(temp_dir.path().join(name), b"x").unwrap();
        }

        let found = collect_images(&[temp_dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn explicit_non_image_path_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let txt = temp_dir.path().join("notes.txt");
        fs::write(&txt, b"x").unwrap();

        assert!(collect_images(&[txt]).is_err());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect_images(&[temp_dir.path().to_path_buf()]).is_err());
    }
}
