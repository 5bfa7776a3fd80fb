//! MIME type and file extension lookups for attachments

use phf::phf_map;

/// MIME type to preferred file extension
pub static MIME_EXTENSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "image/png" => "png",
    "image/jpeg" => "jpg",
    "image/jpg" => "jpg",
    "image/gif" => "gif",
    "image/webp" => "webp",
    "image/bmp" => "bmp",
    "image/svg+xml" => "svg",
    "application/pdf" => "pdf",
    "text/plain" => "txt",
    "text/markdown" => "md",
    "application/json" => "json",
};

/// File extension (lowercase, no dot) to MIME type
pub static EXTENSION_MIMES: phf::Map<&'static str, &'static str> = phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "svg" => "image/svg+xml",
    "pdf" => "application/pdf",
    "txt" => "text/plain",
    "md" => "text/markdown",
    "json" => "application/json",
};

/// Get the file extension for a MIME type
///
/// Parameters such as `; charset=utf-8` are ignored.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    MIME_EXTENSIONS
        .get(essence.to_ascii_lowercase().as_str())
        .copied()
}

/// Get the MIME type for a file extension (with or without leading dot)
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    EXTENSION_MIMES.get(ext.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/png"), Some("png"));
        assert_eq!(extension_for_mime("IMAGE/JPEG"), Some("jpg"));
        assert_eq!(extension_for_mime("text/plain; charset=utf-8"), Some("txt"));
        assert_eq!(extension_for_mime("application/x-unknown"), None);
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension(".JPEG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("exe"), None);
    }
}
