//! # Timestamp Module
//!
//! Resolves a semantic capture time for each candidate file.
//!
//! Photo-kind files are probed for an embedded EXIF `DateTimeOriginal`
//! field; everything else (and every photo where extraction fails for any
//! reason) uses the filesystem's last-modified time. Absent or malformed
//! capture metadata is an expected case, not an error: resolution never
//! fails, it only degrades.

use crate::core::filetype::FileKind;
use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Resolve the timestamp a file should be bucketed under
///
/// Dispatches on the file kind: photos try capture metadata first, all
/// other kinds go straight to mtime. Never returns an error.
pub fn resolve(path: &Path, kind: FileKind) -> DateTime<Local> {
    if kind == FileKind::Photo {
        if let Some(taken) = capture_time(path) {
            tracing::debug!(path = %path.display(), taken = %taken, "using capture time");
            return taken;
        }
    }
    modified_time(path)
}

/// Try to read an EXIF `DateTimeOriginal` capture time
///
/// Returns `None` when the file has no EXIF container, no such field, or
/// the field's value does not match a recognized date-time pattern.
fn capture_time(path: &Path) -> Option<DateTime<Local>> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(&file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let raw = ascii_value(&field.value)?;

    match parse_capture_string(raw) {
        Some(naive) => naive.and_local_timezone(Local).single(),
        None => {
            tracing::warn!(
                path = %path.display(),
                value = raw,
                "unrecognized capture timestamp format, falling back to mtime"
            );
            None
        }
    }
}

/// Extract the first entry of an EXIF ASCII value as a UTF-8 string
fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(entries) => entries.first().and_then(|bytes| std::str::from_utf8(bytes).ok()),
        _ => None,
    }
}

/// Parse a capture string in `YYYY:MM:DD HH:MM:SS` or `YYYY-MM-DD HH:MM:SS`
/// form
///
/// The value is gated on strict field ranges first (month 01-12, day
/// 01-31, hour 00-24, minute/second 00-59); anything outside is treated
/// as malformed. Values that pass the gate but name an impossible
/// calendar date are rejected by chrono and degrade the same way.
fn parse_capture_string(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if !passes_range_gate(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn passes_range_gate(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 19 {
        return false;
    }
    // Positional layout: YYYYsMMsDD HH:MM:SS with s in {:,-}
    let date_sep = bytes[4];
    if !(date_sep == b':' || date_sep == b'-') || bytes[7] != date_sep {
        return false;
    }
    if bytes[10] != b' ' || bytes[13] != b':' || bytes[16] != b':' {
        return false;
    }

    let field = |from: usize, to: usize| -> Option<u32> { s.get(from..to)?.parse().ok() };
    let (month, day) = (field(5, 7), field(8, 10));
    let (hour, minute, second) = (field(11, 13), field(14, 16), field(17, 19));

    matches!(
        (field(0, 4), month, day, hour, minute, second),
        (
            Some(_),
            Some(1..=12),
            Some(1..=31),
            Some(0..=24),
            Some(0..=59),
            Some(0..=59),
        )
    )
}

/// The file's last-modified time, the universal fallback
fn modified_time(path: &Path) -> DateTime<Local> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => DateTime::from(mtime),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "could not read mtime, using current time"
            );
            Local::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn parses_exif_colon_format() {
        let ts = parse_capture_string("2022:12:28 10:00:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2022, 12, 28));
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn parses_dash_format() {
        let ts = parse_capture_string("2023-01-05 23:59:59").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 1, 5));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(parse_capture_string("2022:13:01 10:00:00").is_none()); // month 13
        assert!(parse_capture_string("2022:12:32 10:00:00").is_none()); // day 32
        assert!(parse_capture_string("2022:12:28 25:00:00").is_none()); // hour 25
        assert!(parse_capture_string("2022:12:28 10:60:00").is_none()); // minute 60
        assert!(parse_capture_string("2022:12:28 10:00:60").is_none()); // second 60
    }

    #[test]
    fn rejects_foreign_formats() {
        assert!(parse_capture_string("28/12/2022 10:00:00").is_none());
        assert!(parse_capture_string("2022:12:28T10:00:00").is_none());
        assert!(parse_capture_string("not a date at all!").is_none());
        assert!(parse_capture_string("").is_none());
    }

    #[test]
    fn impossible_calendar_date_degrades() {
        // Passes the numeric gate (day 31) but chrono rejects Feb 31
        assert!(parse_capture_string("2022:02:31 10:00:00").is_none());
    }

    #[test]
    fn mixed_separators_are_rejected() {
        assert!(parse_capture_string("2022:12-28 10:00:00").is_none());
    }

    #[test]
    fn non_photo_kind_uses_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        File::create(&path).unwrap().write_all(b"video").unwrap();

        let resolved = resolve(&path, FileKind::Video);
        let mtime: DateTime<Local> =
            DateTime::from(std::fs::metadata(&path).unwrap().modified().unwrap());
        assert_eq!(resolved.timestamp(), mtime.timestamp());
    }

    #[test]
    fn photo_with_capture_metadata_uses_it() {
        use exif::experimental::Writer;

        // Build a minimal TIFF container carrying only DateTimeOriginal;
        // read_from_container handles raw TIFF as well as JPEG.
        let field = exif::Field {
            tag: Tag::DateTimeOriginal,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"2022:12:28 10:00:00".to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = std::io::Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.tif");
        File::create(&path)
            .unwrap()
            .write_all(buf.get_ref())
            .unwrap();

        let resolved = resolve(&path, FileKind::Photo);
        assert_eq!(
            (resolved.year(), resolved.month(), resolved.day()),
            (2022, 12, 28)
        );
        assert_eq!((resolved.hour(), resolved.minute()), (10, 0));
    }

    #[test]
    fn photo_without_exif_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stripped.jpg");
        File::create(&path).unwrap().write_all(b"not a jpeg").unwrap();

        let resolved = resolve(&path, FileKind::Photo);
        let mtime: DateTime<Local> =
            DateTime::from(std::fs::metadata(&path).unwrap().modified().unwrap());
        assert_eq!(resolved.timestamp(), mtime.timestamp());
    }
}
