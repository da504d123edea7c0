//! Binary/text classification by file extension.

use std::path::Path;

/// Extensions whose content is copied verbatim and never scanned for links.
const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "tif", "tiff", "ico", "heic",
    "avif",
    // audio
    "mp3", "wav", "m4a", "ogg", "flac", "3gp", "aac", "wma", "opus",
    // video
    "mp4", "webm", "ogv", "mov", "mkv", "avi", "wmv", "m4v", "mpg", "mpeg",
    // archives
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "epub",
    // executables and libraries
    "exe", "dll", "so", "dylib", "bin", "app", "msi", "dmg",
];

/// Whether a document at `path` holds binary content.
///
/// Unknown or missing extensions are treated as text.
pub fn is_binary_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| BINARY_EXTENSIONS.contains(&e.as_str()))
}
