//! Portrait resolution: upload encoding and initials placeholders.
//!
//! # Responsibility
//! - Encode uploaded images as self-contained `data:` URLs.
//! - Synthesize a deterministic initials placeholder for records without a
//!   usable photo.
//!
//! # Invariants
//! - Upload size is checked before any bytes are read.
//! - The placeholder for a given name is byte-identical across calls.

use crate::model::contact::ContactRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const MIB: u64 = 1024 * 1024;

/// Default upload ceiling.
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 3 * MIB;

/// Edge length of the square placeholder image.
pub const PLACEHOLDER_SIZE: u32 = 400;

const GRADIENT_START: &str = "#38c6ff";
const GRADIENT_END: &str = "#0d3c4f";
const GLYPH_FILL: &str = "rgba(3, 26, 36, 0.8)";
const GLYPH_FONT_FAMILY: &str = "Rajdhani";
const GLYPH_FONT_SIZE: u32 = 160;
const UNKNOWN_INITIALS: &str = "?";

/// Photo upload failure.
#[derive(Debug)]
pub enum PhotoError {
    /// Upload exceeds the configured ceiling; nothing was read.
    TooLarge { size: u64, limit: u64 },
    /// The file could not be read.
    Read(io::Error),
}

impl PhotoError {
    /// Message shown to the user, if this failure warrants one.
    ///
    /// Read failures are silent and fall back to a placeholder.
    pub fn alert_message(&self) -> Option<String> {
        match self {
            Self::TooLarge { limit, .. } => Some(format!(
                "Portrait file is larger than {}. Please choose a smaller image.",
                format_megabytes(*limit)
            )),
            Self::Read(_) => None,
        }
    }
}

impl Display for PhotoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size, limit } => {
                write!(f, "photo upload is {size} bytes, limit is {limit}")
            }
            Self::Read(err) => write!(f, "failed to read photo upload: {err}"),
        }
    }
}

impl Error for PhotoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TooLarge { .. } => None,
            Self::Read(err) => Some(err),
        }
    }
}

impl From<io::Error> for PhotoError {
    fn from(value: io::Error) -> Self {
        Self::Read(value)
    }
}

/// Where an upload's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// One file chosen in a form's photo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    file_name: String,
    source: PhotoSource,
}

impl PhotoUpload {
    /// Upload whose bytes the host already holds.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: PhotoSource::Bytes(bytes),
        }
    }

    /// Upload read lazily from disk at submit time.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            source: PhotoSource::Path(path),
        }
    }

    /// Name shown next to the file input.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &PhotoSource {
        &self.source
    }

    /// Size in bytes, without reading file contents.
    pub fn size(&self) -> io::Result<u64> {
        match &self.source {
            PhotoSource::Bytes(bytes) => Ok(bytes.len() as u64),
            PhotoSource::Path(path) => Ok(std::fs::metadata(path)?.len()),
        }
    }

    fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            PhotoSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            PhotoSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
        }
    }
}

/// Encodes an upload as a `data:<mime>;base64,...` URL.
///
/// # Errors
/// - `TooLarge` when the upload exceeds `max_bytes` (checked before reading).
/// - `Read` when the file cannot be inspected or read.
pub fn encode_upload(upload: &PhotoUpload, max_bytes: u64) -> Result<String, PhotoError> {
    let size = upload.size()?;
    if size > max_bytes {
        return Err(PhotoError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = upload.read()?;
    let mime = sniff_mime(&bytes)
        .or_else(|| mime_from_extension(upload.file_name()))
        .unwrap_or("application/octet-stream");
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)))
}

/// Up to two uppercase initials from whitespace-separated name tokens.
///
/// Returns an empty string when the name has no tokens.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Initials placeholder encoded as an inline SVG `data:` URL.
pub fn placeholder_portrait(name: &str) -> String {
    let initials = initials(name);
    let glyphs = if initials.is_empty() {
        UNKNOWN_INITIALS
    } else {
        initials.as_str()
    };
    let svg = placeholder_svg(glyphs);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Image source to display for `record`: its photo, else a placeholder.
pub fn portrait_source(record: &ContactRecord) -> Cow<'_, str> {
    match record.usable_photo() {
        Some(photo) => Cow::Borrowed(photo),
        None => Cow::Owned(placeholder_portrait(record.name.as_str())),
    }
}

fn placeholder_svg(glyphs: &str) -> String {
    let size = PLACEHOLDER_SIZE;
    let center = size / 2;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<defs><linearGradient id="bg" gradientUnits="userSpaceOnUse" x1="0" y1="0" x2="{size}" y2="{size}">"#,
            r#"<stop offset="0" stop-color="{start}"/><stop offset="1" stop-color="{end}"/>"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="{size}" height="{size}" fill="url(#bg)"/>"#,
            r#"<text x="{center}" y="{center}" fill="{fill}" font-family="{family}" font-weight="bold" font-size="{font_size}" text-anchor="middle" dominant-baseline="central">{glyphs}</text>"#,
            "</svg>"
        ),
        size = size,
        center = center,
        start = GRADIENT_START,
        end = GRADIENT_END,
        fill = GLYPH_FILL,
        family = GLYPH_FONT_FAMILY,
        font_size = GLYPH_FONT_SIZE,
        glyphs = escape_xml(glyphs),
    )
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

fn format_megabytes(bytes: u64) -> String {
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        encode_upload, initials, placeholder_portrait, portrait_source, PhotoError, PhotoUpload,
        DEFAULT_MAX_PHOTO_BYTES,
    };
    use crate::model::contact::ContactRecord;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::path::PathBuf;

    fn decode_placeholder(url: &str) -> String {
        let payload = url
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("placeholder should be an inline svg");
        String::from_utf8(STANDARD.decode(payload).expect("valid base64")).expect("utf-8 svg")
    }

    #[test]
    fn initials_take_first_two_tokens_uppercased() {
        assert_eq!(initials("Rick Sanchez"), "RS");
        assert_eq!(initials("  president   morty  smith "), "PM");
        assert_eq!(initials("cher"), "C");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn placeholder_is_deterministic_and_centers_initials() {
        let first = placeholder_portrait("Rick Sanchez");
        assert_eq!(first, placeholder_portrait("Rick Sanchez"));
        let svg = decode_placeholder(&first);
        assert!(svg.contains(">RS</text>"));
        assert!(svg.contains("#38c6ff"));
        assert!(svg.contains("#0d3c4f"));
        assert!(svg.contains(r#"width="400""#));
    }

    #[test]
    fn placeholder_uses_question_mark_for_blank_names() {
        let svg = decode_placeholder(&placeholder_portrait("   "));
        assert!(svg.contains(">?</text>"));
    }

    #[test]
    fn placeholder_escapes_markup_in_initials() {
        let svg = decode_placeholder(&placeholder_portrait("<b> &co"));
        assert!(svg.contains(">&lt;&amp;</text>"));
    }

    #[test]
    fn portrait_source_prefers_stored_photo() {
        let mut record = ContactRecord::new("Ana Ray");
        assert!(portrait_source(&record).starts_with("data:image/svg+xml"));
        record.photo = Some("https://example.com/ana.png".to_string());
        assert_eq!(portrait_source(&record), "https://example.com/ana.png");
    }

    #[test]
    fn encode_upload_sniffs_png_bytes() {
        let upload = PhotoUpload::from_bytes("portrait.bin", b"\x89PNG\r\n\x1a\nrest".to_vec());
        let url = encode_upload(&upload, DEFAULT_MAX_PHOTO_BYTES).expect("small upload encodes");
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn encode_upload_falls_back_to_extension_then_octet_stream() {
        let svg = PhotoUpload::from_bytes("face.SVG", b"<svg/>".to_vec());
        assert!(encode_upload(&svg, 1024)
            .expect("encodes")
            .starts_with("data:image/svg+xml;base64,"));

        let unknown = PhotoUpload::from_bytes("face", vec![1, 2, 3]);
        assert_eq!(
            encode_upload(&unknown, 1024).expect("encodes"),
            "data:application/octet-stream;base64,AQID"
        );
    }

    #[test]
    fn encode_upload_rejects_oversized_files_with_alert() {
        let upload = PhotoUpload::from_bytes("big.png", vec![0; 5 * 1024 * 1024]);
        let err = encode_upload(&upload, DEFAULT_MAX_PHOTO_BYTES).expect_err("too large");
        assert!(matches!(err, PhotoError::TooLarge { .. }));
        assert_eq!(
            err.alert_message().as_deref(),
            Some("Portrait file is larger than 3MB. Please choose a smaller image.")
        );
    }

    #[test]
    fn encode_upload_reports_missing_files_without_alert() {
        let upload = PhotoUpload::from_path(PathBuf::from("/definitely/not/here/face.png"));
        assert_eq!(upload.file_name(), "face.png");
        let err = encode_upload(&upload, DEFAULT_MAX_PHOTO_BYTES).expect_err("missing file");
        assert!(matches!(err, PhotoError::Read(_)));
        assert_eq!(err.alert_message(), None);
    }
}
