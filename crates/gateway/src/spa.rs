//! Single-page-app fallback for paths no API route consumed.
//!
//! File serving itself is delegated to `tower-http`; the piece owned here is
//! the traversal guard: the requested path must resolve inside the static
//! root or the request is rejected with 400 before any filesystem access.

use std::path::{Component, Path, PathBuf};

use axum::extract::{Extension, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::envelope;

#[derive(Clone)]
pub struct SpaService {
    root: PathBuf,
    files: ServeDir<ServeFile>,
}

impl SpaService {
    /// `root` is the static asset directory; `index_file` (relative to the
    /// root) is served for every path that does not name an existing file.
    pub fn new(root: impl Into<PathBuf>, index_file: &str) -> Self {
        let root = root.into();
        let index = root.join(index_file);
        let files = ServeDir::new(&root).fallback(ServeFile::new(index));
        Self { root, files }
    }
}

pub async fn spa_handler(Extension(spa): Extension<SpaService>, req: Request) -> Response {
    if resolve_request_path(&spa.root, req.uri().path()).is_none() {
        return envelope::error_response(StatusCode::BAD_REQUEST, "Error: invalid asset path");
    }

    match spa.files.clone().oneshot(req).await {
        Ok(resp) => resp.into_response(),
        Err(_) => envelope::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error reading static asset",
        ),
    }
}

/// Percent-decode `raw_path` and lexically resolve it under `root`. Returns
/// `None` when the path is not valid UTF-8 once decoded or would escape the
/// root, which callers must map to 400; the raw client-supplied path is
/// never handed to the filesystem.
///
/// Decoding must happen before the component walk: the URI path is still
/// percent-encoded here, and `%2e%2e` is a plain segment until decoded.
fn resolve_request_path(root: &Path, raw_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw_path).decode_utf8().ok()?;
    let mut resolved = PathBuf::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(root.join(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_resolve_inside_root() {
        let root = Path::new("/srv/ui");
        assert_eq!(
            resolve_request_path(root, "/static/js/main.js"),
            Some(PathBuf::from("/srv/ui/static/js/main.js"))
        );
        assert_eq!(resolve_request_path(root, "/"), Some(PathBuf::from("/srv/ui")));
    }

    #[test]
    fn dotdot_inside_root_is_allowed() {
        let root = Path::new("/srv/ui");
        assert_eq!(
            resolve_request_path(root, "/static/../index.html"),
            Some(PathBuf::from("/srv/ui/index.html"))
        );
    }

    #[test]
    fn escaping_the_root_is_rejected() {
        let root = Path::new("/srv/ui");
        assert_eq!(resolve_request_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/static/../../etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/.."), None);
    }

    #[test]
    fn percent_encoded_dot_segments_are_rejected() {
        let root = Path::new("/srv/ui");
        assert_eq!(resolve_request_path(root, "/%2e%2e/%2e%2e/etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/static/%2E%2E/../etc/passwd"), None);
        // Encoded separators decode into extra components, not literals.
        assert_eq!(resolve_request_path(root, "/%2e%2e%2fetc/passwd"), None);
    }

    #[test]
    fn encoded_names_that_stay_inside_root_still_resolve() {
        let root = Path::new("/srv/ui");
        assert_eq!(
            resolve_request_path(root, "/static/caf%C3%A9.js"),
            Some(PathBuf::from("/srv/ui/static/café.js"))
        );
    }

    #[test]
    fn invalid_utf8_after_decoding_is_rejected() {
        let root = Path::new("/srv/ui");
        assert_eq!(resolve_request_path(root, "/static/%ff.js"), None);
    }
}
