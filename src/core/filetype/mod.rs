//! # File Type Module
//!
//! Classifies files by extension into photo, video, or generic kinds and
//! holds the immutable set of extensions a run will consider.
//!
//! The set is built once from configuration and threaded through the
//! scanner and engine; nothing mutates it mid-run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Extensions that may carry embedded capture metadata
const PHOTO_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".heic", ".heif", ".tiff", ".tif"];

/// Extensions treated as video material
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".avi", ".mkv"];

/// The kind of a candidate file, decided purely by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// May carry embedded capture metadata (EXIF)
    Photo,
    /// Video material, timestamped by mtime
    Video,
    /// Anything else the user asked to archive
    Generic,
}

/// The immutable set of extensions recognized for one run
///
/// Extensions are stored normalized: lower-case with a leading dot.
/// `BTreeSet` keeps iteration order stable for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeSet {
    photos: BTreeSet<String>,
    videos: BTreeSet<String>,
    others: BTreeSet<String>,
}

/// Normalize an extension to lower-case with a leading dot
///
/// Accepts "JPG", ".jpg", "jpg" and yields ".jpg" for all of them.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

impl FileTypeSet {
    /// The default photo + video extension set
    pub fn defaults() -> Self {
        Self {
            photos: PHOTO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            videos: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            others: BTreeSet::new(),
        }
    }

    /// A set built only from user-supplied extensions, replacing the defaults
    ///
    /// Custom extensions that match a known photo or video extension keep
    /// that kind; the rest are classified as generic.
    pub fn from_custom<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self {
            photos: BTreeSet::new(),
            videos: BTreeSet::new(),
            others: BTreeSet::new(),
        };
        for ext in extensions {
            set.insert(&normalize_extension(ext.as_ref()));
        }
        set
    }

    /// The defaults extended with user-supplied extensions
    pub fn defaults_with<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::defaults();
        for ext in extensions {
            set.insert(&normalize_extension(ext.as_ref()));
        }
        set
    }

    fn insert(&mut self, normalized: &str) {
        if PHOTO_EXTENSIONS.contains(&normalized) {
            self.photos.insert(normalized.to_string());
        } else if VIDEO_EXTENSIONS.contains(&normalized) {
            self.videos.insert(normalized.to_string());
        } else {
            self.others.insert(normalized.to_string());
        }
    }

    /// Whether no extensions are recognized at all
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.videos.is_empty() && self.others.is_empty()
    }

    /// Membership test for a normalized extension
    pub fn contains(&self, normalized: &str) -> bool {
        self.photos.contains(normalized)
            || self.videos.contains(normalized)
            || self.others.contains(normalized)
    }

    /// Check whether a path's extension is recognized
    pub fn matches(&self, path: &Path) -> bool {
        match extension_of(path) {
            Some(ext) => self.contains(&ext),
            None => false,
        }
    }

    /// Classify a path into a file kind
    ///
    /// Unrecognized extensions classify as generic; kind only controls
    /// timestamp resolution, not whether a file is scanned.
    pub fn classify(&self, path: &Path) -> FileKind {
        match extension_of(path) {
            Some(ext) if self.photos.contains(&ext) => FileKind::Photo,
            Some(ext) if self.videos.contains(&ext) => FileKind::Video,
            _ => FileKind::Generic,
        }
    }

    /// Iterate all recognized extensions in stable order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.photos
            .iter()
            .chain(self.videos.iter())
            .chain(self.others.iter())
            .map(|s| s.as_str())
    }
}

/// Extract a path's extension, normalized, if it has one
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_recognize_jpg_and_mp4() {
        let set = FileTypeSet::defaults();
        assert!(set.matches(&PathBuf::from("/photos/img.jpg")));
        assert!(set.matches(&PathBuf::from("/videos/clip.MP4")));
        assert!(!set.matches(&PathBuf::from("/docs/report.pdf")));
    }

    #[test]
    fn classify_photo_video_generic() {
        let set = FileTypeSet::defaults_with(["raw"]);
        assert_eq!(set.classify(Path::new("a.jpg")), FileKind::Photo);
        assert_eq!(set.classify(Path::new("a.mov")), FileKind::Video);
        assert_eq!(set.classify(Path::new("a.raw")), FileKind::Generic);
    }

    #[test]
    fn normalize_handles_dot_and_case() {
        assert_eq!(normalize_extension("JPG"), ".jpg");
        assert_eq!(normalize_extension(".Jpeg"), ".jpeg");
        assert_eq!(normalize_extension("mp4"), ".mp4");
    }

    #[test]
    fn custom_set_replaces_defaults() {
        let set = FileTypeSet::from_custom(["png"]);
        assert!(set.matches(Path::new("a.png")));
        assert!(!set.matches(Path::new("a.jpg")));
        // Known photo extension keeps its kind even in a custom set
        assert_eq!(set.classify(Path::new("a.png")), FileKind::Photo);
    }

    #[test]
    fn custom_unknown_extension_is_generic() {
        let set = FileTypeSet::from_custom(["xyz"]);
        assert!(set.matches(Path::new("file.xyz")));
        assert_eq!(set.classify(Path::new("file.xyz")), FileKind::Generic);
    }

    #[test]
    fn empty_custom_set_is_empty() {
        let set = FileTypeSet::from_custom(Vec::<String>::new());
        assert!(set.is_empty());
        assert!(!FileTypeSet::defaults().is_empty());
    }

    #[test]
    fn no_extension_never_matches() {
        let set = FileTypeSet::defaults();
        assert!(!set.matches(Path::new("/photos/README")));
        assert_eq!(set.classify(Path::new("/photos/README")), FileKind::Generic);
    }
}
