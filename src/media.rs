use crate::errors::AppError;
use actix_multipart::form::tempfile::TempFile;
use mime_guess::mime;
use std::path::Path;
use uuid::Uuid;

/// Extension a stored upload gets, picked from the type guessed for the
/// client's file name. Only raster image types are accepted; SVG can carry
/// script and is refused.
pub fn image_extension(file_name: &str) -> Option<&'static str> {
    let guessed = mime_guess::from_path(file_name).first()?;
    if guessed.type_() != mime::IMAGE {
        return None;
    }
    match guessed.subtype().as_str() {
        "gif" => Some("gif"),
        "png" => Some("png"),
        "jpeg" => Some("jpg"),
        "bmp" => Some("bmp"),
        "webp" => Some("webp"),
        _ => None,
    }
}

/// Copies an upload under `<media_root>/posts/` and returns its path
/// relative to the media root. The client's file name is not reused.
pub async fn store_post_image(media_root: &Path, upload: &TempFile) -> Result<String, AppError> {
    let file_name = upload.file_name.as_deref().unwrap_or_default();
    let extension = image_extension(file_name)
        .ok_or_else(|| anyhow::anyhow!("refusing to store non-image upload {:?}", file_name))?;
    let relative = format!("posts/{}.{}", Uuid::new_v4().simple(), extension);
    let dest = media_root.join(&relative);

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::copy(upload.file.path(), &dest).await?;

    log::info!("Stored upload at {}", dest.display());
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_images_get_a_fixed_extension() {
        assert_eq!(image_extension("small.gif"), Some("gif"));
        assert_eq!(image_extension("Photo.JPEG"), Some("jpg"));
        assert_eq!(image_extension("C:\\pics\\my cat.png"), Some("png"));
    }

    #[test]
    fn markup_and_unknown_types_are_refused() {
        assert_eq!(image_extension("evil.html"), None);
        assert_eq!(image_extension("drawing.svg"), None);
        assert_eq!(image_extension("notes.txt"), None);
        assert_eq!(image_extension("no_extension"), None);
        assert_eq!(image_extension(""), None);
    }
}
