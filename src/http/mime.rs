//! Content-Type detection from file name suffixes.

/// Fallback for suffixes outside the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the Content-Type for a file name or path.
///
/// A name with no suffix (or a trailing dot) is served as plain text.
///
/// ```
/// # use searchd::http::mime::content_type_for;
/// assert_eq!(content_type_for("img/logo.png"), "image/png");
/// assert_eq!(content_type_for("README"), "text/plain");
/// assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);

    let suffix = match name.rsplit_once('.') {
        Some((_, suffix)) => suffix.to_ascii_lowercase(),
        None => return "text/plain",
    };

    match suffix.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "txt" | "" => "text/plain",
        "xml" => "text/xml",
        "csv" => "text/csv",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "png" => "image/png",
        "tiff" => "image/tiff",
        _ => OCTET_STREAM,
    }
}
