//! Request routing.
//!
//! URIs under `/static/` are served from the static file directory; every
//! other URI renders the search page.

pub mod files;
pub mod query;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::search::RankingEngine;

/// URI prefix that selects the file handler.
pub const STATIC_PREFIX: &str = "/static/";

/// Which handler a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StaticFile,
    Query,
}

impl Route {
    pub fn classify(uri: &str) -> Self {
        if uri.starts_with(STATIC_PREFIX) {
            Route::StaticFile
        } else {
            Route::Query
        }
    }
}

/// Dispatches parsed requests. Shared read-only by every worker.
pub struct Router {
    static_dir: PathBuf,
    engine: Arc<dyn RankingEngine>,
}

impl Router {
    pub fn new(static_dir: impl Into<PathBuf>, engine: Arc<dyn RankingEngine>) -> Self {
        Self {
            static_dir: static_dir.into(),
            engine,
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Produces the response for one request. Never fails; a missing file
    /// is a 404, not an error.
    pub async fn process(&self, req: &Request) -> Response {
        match Route::classify(&req.uri) {
            Route::StaticFile => files::handle_file_request(&req.uri, &self.static_dir).await,
            Route::Query => query::handle_query_request(&req.uri, self.engine.as_ref()),
        }
    }
}
