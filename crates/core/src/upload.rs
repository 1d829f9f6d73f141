//! Image upload policy and naming.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Default maximum upload size: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const MIB: u64 = 1024 * 1024;

/// Why an upload was refused before anything was stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejected {
    #[error("File size must be less than {}MB", .limit / MIB)]
    TooLarge { size: u64, limit: u64 },

    #[error("Please select an image file")]
    NotAnImage(String),
}

/// Size and media-type constraints applied to every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Check a file's declared size, then its media type.
    pub fn check(&self, size: u64, content_type: &str) -> Result<(), UploadRejected> {
        if size > self.max_bytes {
            return Err(UploadRejected::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        if !is_image_type(content_type) {
            return Err(UploadRejected::NotAnImage(content_type.to_owned()));
        }
        Ok(())
    }
}

/// `true` for `image/*` media types.
pub fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Preferred file extension for an image media type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/svg+xml" => Some("svg"),
        "image/tiff" => Some("tiff"),
        "image/avif" => Some("avif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Best-effort media type for a stored file name, used when serving it back.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

fn original_extension(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > 10
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn random_token() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut token = String::with_capacity(10);
    for _ in 0..10 {
        token.push(char::from(ALPHABET[(n % 36) as usize]));
        n /= 36;
    }
    token
}

/// Generate a collision-resistant storage name:
/// `"{unix_millis}-{random token}.{ext}"`.
///
/// The extension comes from the original file name when it has a usable
/// one, else from the media type, else `bin`.
pub fn generate_file_name(original_name: &str, content_type: &str) -> String {
    let ext = original_extension(original_name)
        .or_else(|| extension_for(content_type).map(str::to_owned))
        .unwrap_or_else(|| "bin".to_owned());
    format!(
        "{}-{}.{ext}",
        Utc::now().timestamp_millis(),
        random_token()
    )
}

/// `true` when `name` looks like something [`generate_file_name`] produced
/// (no path separators, no leading dot).
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Metadata returned for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "fileName": "1735689600000-k3j9x0a1bz.jpg",
    "fileUrl": "http://localhost:3001/uploads/1735689600000-k3j9x0a1bz.jpg",
    "fileSize": 204800,
    "mimeType": "image/jpeg"
})))]
pub struct UploadedFile {
    pub file_name: String,
    pub file_url: String,
    pub file_size: u64,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_megabytes_is_rejected_with_size_message() {
        let err = UploadPolicy::default()
            .check(6 * 1024 * 1024, "image/jpeg")
            .unwrap_err();
        assert!(matches!(err, UploadRejected::TooLarge { .. }));
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn size_is_checked_before_media_type() {
        let err = UploadPolicy::default()
            .check(6 * 1024 * 1024, "application/octet-stream")
            .unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn exact_limit_is_accepted() {
        assert!(UploadPolicy::default().check(DEFAULT_MAX_UPLOAD_BYTES, "image/png").is_ok());
    }

    #[test]
    fn non_images_are_rejected() {
        let err = UploadPolicy::default().check(10, "application/pdf").unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
        assert!(UploadPolicy::default().check(10, "IMAGE/PNG").is_ok());
    }

    #[test]
    fn generated_names_keep_original_extension() {
        let name = generate_file_name("holiday.JPEG", "image/jpeg");
        let (stamp, rest) = name.split_once('-').unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        assert!(rest.ends_with(".jpeg"));
        assert_eq!(rest.len(), "0123456789.jpeg".len());
        assert!(is_safe_file_name(&name));
    }

    #[test]
    fn extension_falls_back_to_media_type() {
        assert!(generate_file_name("blob", "image/png").ends_with(".png"));
        assert!(generate_file_name(".hidden", "image/webp").ends_with(".webp"));
        assert!(generate_file_name("x.p/g", "image/unknown").ends_with(".bin"));
    }

    #[test]
    fn generated_names_differ() {
        let a = generate_file_name("a.png", "image/png");
        let b = generate_file_name("a.png", "image/png");
        assert_ne!(a, b);
    }

    #[test]
    fn unsafe_names_are_detected() {
        assert!(!is_safe_file_name("../etc/passwd"));
        assert!(!is_safe_file_name(".env"));
        assert!(!is_safe_file_name("a/b.png"));
        assert!(!is_safe_file_name(""));
    }

    #[test]
    fn uploaded_file_uses_camel_case() {
        let file = UploadedFile {
            file_name: "1-a.png".into(),
            file_url: "http://x/1-a.png".into(),
            file_size: 3,
            mime_type: "image/png".into(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["fileName"], "1-a.png");
        assert_eq!(json["mimeType"], "image/png");
    }

    #[test]
    fn content_type_is_guessed_from_name() {
        assert_eq!(content_type_for("1-a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
