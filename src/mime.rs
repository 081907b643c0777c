//! Best-effort MIME detection from the first bytes of a file.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::utils::config::{MIME_FALLBACK, MIME_SNIFF_LEN};

/// Known signatures, checked in order against the start of the buffer.
const MAGIC: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b\x08", "application/x-gzip"),
    (b"BZh", "application/x-bzip2"),
    (b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    (b"Rar!\x1a\x07", "application/x-rar-compressed"),
    (b"\x7fELF", "application/x-executable"),
    (b"OggS", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"fLaC", "audio/flac"),
    (b"\x1a\x45\xdf\xa3", "video/webm"),
    (b"wOFF", "font/woff"),
    (b"wOF2", "font/woff2"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"SQLite format 3\x00", "application/vnd.sqlite3"),
];

/// Sniff `path`. Unopenable file or empty content → `Ok(None)`; a read error other than EOF → `Err`.
/// Otherwise magic numbers, then a text check, then the extension, then `application/octet-stream`.
pub fn detect_mime_type(path: &Path) -> io::Result<Option<String>> {
    let Ok(file) = File::open(path) else {
        return Ok(None);
    };
    let mut buf = Vec::with_capacity(MIME_SNIFF_LEN);
    file.take(MIME_SNIFF_LEN as u64).read_to_end(&mut buf)?;
    if buf.is_empty() {
        return Ok(None);
    }
    Ok(Some(sniff(&buf, path)))
}

/// Content type for a non-empty head buffer; `path` is only used for the extension lookup.
pub fn sniff(buf: &[u8], path: &Path) -> String {
    if let Some(mime) = sniff_magic(buf) {
        return mime.to_string();
    }
    if looks_like_text(buf) {
        return text_type(buf, path);
    }
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(MIME_FALLBACK)
        .to_string()
}

fn sniff_magic(buf: &[u8]) -> Option<&'static str> {
    if let Some((_, mime)) = MAGIC.iter().find(|(sig, _)| buf.starts_with(sig)) {
        return Some(*mime);
    }
    // RIFF containers carry the format at offset 8.
    if buf.len() >= 12 && buf.starts_with(b"RIFF") {
        return match &buf[8..12] {
            b"WAVE" => Some("audio/wave"),
            b"AVI " => Some("video/avi"),
            b"WEBP" => Some("image/webp"),
            _ => None,
        };
    }
    if buf.len() >= 12 && &buf[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    None
}

/// No control bytes other than whitespace/escape, and valid UTF-8 apart from a possibly cut-off tail.
fn looks_like_text(buf: &[u8]) -> bool {
    if buf
        .iter()
        .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
    {
        return false;
    }
    match std::str::from_utf8(buf) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && buf.len() == MIME_SNIFF_LEN,
    }
}

fn text_type(buf: &[u8], path: &Path) -> String {
    let head = String::from_utf8_lossy(buf);
    let trimmed = head.trim_start().to_ascii_lowercase();
    if trimmed.starts_with("<!doctype html") || trimmed.starts_with("<html") {
        return "text/html; charset=utf-8".to_string();
    }
    if trimmed.starts_with("<?xml") {
        return "text/xml; charset=utf-8".to_string();
    }
    // Prefer a text/* guess from the extension (e.g. text/css), else plain.
    match mime_guess::from_path(path).first() {
        Some(m) if m.type_().as_str() == "text" => {
            format!("{}; charset=utf-8", m.essence_str())
        }
        _ => "text/plain; charset=utf-8".to_string(),
    }
}
