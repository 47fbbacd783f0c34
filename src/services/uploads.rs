use std::path::Path;

use uuid::Uuid;

const DEFAULT_EXTENSION: &str = "png";

/// Writes an uploaded image into the uploads directory and returns the
/// server-relative URL it will be served under.
pub async fn save_image(
    dir: &Path,
    file_name: Option<&str>,
    data: &[u8],
) -> std::io::Result<String> {
    tokio::fs::create_dir_all(dir).await?;

    let name = format!("{}.{}", Uuid::new_v4(), sanitize_extension(file_name));
    tokio::fs::write(dir.join(&name), data).await?;
    Ok(format!("/uploads/{name}"))
}

/// Keeps only a short ASCII-alphanumeric extension from the client-supplied
/// file name; everything else falls back to a fixed default.
fn sanitize_extension(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|name| {
            let (stem, ext) = name.rsplit_once('.')?;
            if stem.is_empty() {
                return None;
            }
            Some(ext)
        })
        .unwrap_or(DEFAULT_EXTENSION);

    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_extension;

    #[test]
    fn takes_extension_from_file_name() {
        assert_eq!(sanitize_extension(Some("photo.JPEG")), "jpeg");
        assert_eq!(sanitize_extension(Some("a.b.webp")), "webp");
    }

    #[test]
    fn falls_back_without_usable_extension() {
        assert_eq!(sanitize_extension(None), "png");
        assert_eq!(sanitize_extension(Some("noext")), "png");
        assert_eq!(sanitize_extension(Some(".hidden")), "png");
        assert_eq!(sanitize_extension(Some("weird.!!!")), "png");
    }
}
