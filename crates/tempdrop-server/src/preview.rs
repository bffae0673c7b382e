//! In-browser preview rendering

use crate::types::{Payload, StoredFile};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use ts_rs::TS;

/// How the client should render a preview that is not plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PreviewKind {
    /// `content` is a `data:` URI
    Image,
    /// `content` is a human-readable summary; the file is not previewable
    Info,
}

/// Response of `GET /api/view/{filename}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Preview {
    pub content: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub kind: Option<PreviewKind>,
}

/// Render a preview of a stored file based on its kind and content type
pub fn render(file: &StoredFile) -> Preview {
    let content_type = file.info.content_type.as_str();

    match &file.payload {
        Payload::Text(text) => Preview {
            content: text.clone(),
            kind: None,
        },
        Payload::Binary(data) if is_textual(content_type) => Preview {
            content: String::from_utf8_lossy(data).into_owned(),
            kind: None,
        },
        Payload::Binary(data) if content_type.starts_with("image/") => Preview {
            content: format!("data:{};base64,{}", content_type, STANDARD.encode(data)),
            kind: Some(PreviewKind::Image),
        },
        Payload::Binary(_) => Preview {
            content: format!("File size: {}", format_file_size(file.info.size)),
            kind: Some(PreviewKind::Info),
        },
    }
}

fn is_textual(content_type: &str) -> bool {
    content_type.starts_with("text/") || content_type == "application/json"
}

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count in 1024-based units with at most two decimals,
/// trailing zeros dropped (`1536` is `1.5 KB`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::Expiry;
    use crate::types::NewFile;
    use chrono::Utc;

    fn stored(file: NewFile) -> StoredFile {
        StoredFile {
            id: 1,
            info: file.info,
            payload: file.payload,
        }
    }

    fn binary(content_type: &str, data: Vec<u8>) -> StoredFile {
        stored(NewFile::binary(
            "sample",
            "sample".to_string(),
            content_type.to_string(),
            data,
            Expiry::OneHour,
            Utc::now(),
        ))
    }

    #[test]
    fn test_text_upload_preview() {
        let file = stored(NewFile::text(
            "notes",
            "line one\nline two".to_string(),
            Expiry::OneHour,
            Utc::now(),
        ));
        let preview = render(&file);
        assert_eq!(preview.content, "line one\nline two");
        assert_eq!(preview.kind, None);
    }

    #[test]
    fn test_textual_binary_preview() {
        let preview = render(&binary("text/markdown", b"# Title".to_vec()));
        assert_eq!(preview.content, "# Title");
        assert_eq!(preview.kind, None);

        let preview = render(&binary("application/json", br#"{"a":1}"#.to_vec()));
        assert_eq!(preview.content, r#"{"a":1}"#);
        assert_eq!(preview.kind, None);
    }

    #[test]
    fn test_image_preview_is_data_uri() {
        let data = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 255];
        let preview = render(&binary("image/png", data.clone()));
        assert_eq!(preview.kind, Some(PreviewKind::Image));

        let encoded = preview
            .content
            .strip_prefix("data:image/png;base64,")
            .expect("data URI prefix");
        assert_eq!(STANDARD.decode(encoded).unwrap(), data);
    }

    #[test]
    fn test_unknown_binary_preview_is_size_summary() {
        let preview = render(&binary("application/octet-stream", vec![0; 2048]));
        assert_eq!(preview.content, "File size: 2 KB");
        assert_eq!(preview.kind, Some(PreviewKind::Info));
    }

    #[test]
    fn test_preview_serialization() {
        let json = serde_json::to_value(Preview {
            content: "hello".to_string(),
            kind: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "content": "hello" }));

        let json = serde_json::to_value(Preview {
            content: "File size: 1 KB".to_string(),
            kind: Some(PreviewKind::Info),
        })
        .unwrap();
        assert_eq!(json["type"], "info");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1), "1 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(2_048_000), "1.95 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }
}
