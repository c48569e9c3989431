//! Splits a request URI into its decoded path and query arguments.

use std::collections::HashMap;
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

/// Decoded pieces of a request URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub path: String,
    pub args: HashMap<String, String>,
}

/// Parses `uri` into a percent-decoded path and its query arguments.
///
/// Query arguments follow form encoding (`+` is a space). When a name
/// repeats, the last value wins. Fragments are dropped.
pub fn parse_url(uri: &str) -> UrlParts {
    let uri = uri.split_once('#').map_or(uri, |(before, _)| before);
    let (raw_path, query) = uri.split_once('?').unwrap_or((uri, ""));

    let args = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    UrlParts {
        path: percent_decode_str(raw_path).decode_utf8_lossy().into_owned(),
        args,
    }
}
