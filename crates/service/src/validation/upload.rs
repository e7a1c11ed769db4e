use bytes::Bytes;

use super::Rejection;

/// Form field the image payload must arrive under.
pub const FILE_FIELD: &str = "file";

/// One multipart part as received, before any rule is applied.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field_name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// `image/jpg` is accepted as an alias of `image/jpeg`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// A single accepted image payload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Bytes,
}

pub fn validate_attachments(parts: Vec<Attachment>) -> Result<ImageUpload, Rejection> {
    if parts.len() != 1 {
        return Err(Rejection::AttachmentCount(parts.len()));
    }
    let Some(part) = parts.into_iter().next() else {
        return Err(Rejection::AttachmentCount(0));
    };
    match part.field_name.as_deref() {
        Some(FILE_FIELD) => {}
        other => return Err(Rejection::UnexpectedPart(other.unwrap_or_default().to_string())),
    }
    let file_name = part
        .file_name
        .map(|n| sanitize_file_name(&n))
        .filter(|n| !n.is_empty())
        .ok_or(Rejection::MissingFileName)?;
    let declared = part.content_type.unwrap_or_default();
    let format = ImageFormat::from_mime(&declared).ok_or(Rejection::UnsupportedContentType(declared))?;
    if part.bytes.is_empty() {
        return Err(Rejection::EmptyFile);
    }
    Ok(ImageUpload { file_name, format, bytes: part.bytes })
}

/// Keep only the final path component so a client cannot steer the blob key.
fn sanitize_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}
