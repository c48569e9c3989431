use std::io;
use std::path::Path;

use crate::http::escape::escape_html;
use crate::http::mime::content_type_for;
use crate::http::response::{Response, StatusCode};
use crate::http::url::parse_url;
use crate::router::STATIC_PREFIX;

/// Reads `relative` from inside `base_dir`.
///
/// Paths that resolve outside `base_dir`, or that are not regular files,
/// are reported as `NotFound`.
pub async fn read_file(base_dir: &Path, relative: &str) -> io::Result<Vec<u8>> {
    let base = tokio::fs::canonicalize(base_dir).await?;
    let target = tokio::fs::canonicalize(base.join(relative)).await?;

    if !target.starts_with(&base) {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "path escapes the static directory",
        ));
    }

    if !tokio::fs::metadata(&target).await?.is_file() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
    }

    tokio::fs::read(&target).await
}

/// Serves `/static/<path>` from `base_dir`.
pub async fn handle_file_request(uri: &str, base_dir: &Path) -> Response {
    let parts = parse_url(uri);
    let file_name = parts
        .path
        .strip_prefix(STATIC_PREFIX)
        .unwrap_or(parts.path.as_str());

    match read_file(base_dir, file_name).await {
        Ok(contents) => {
            let mut response = Response::ok(contents);
            response.set_content_type(content_type_for(file_name));
            response
        }
        Err(e) => {
            tracing::debug!(file = file_name, error = %e, "static file not served");

            let mut response = Response::new(StatusCode::NotFound);
            response.set_content_type("text/html");
            response.append_to_body("<html><body>Couldn't find file \"");
            response.append_to_body(escape_html(file_name));
            response.append_to_body("\"</body></html>\n");
            response
        }
    }
}
