use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use http::{Response, StatusCode, header};
use mime::Mime;
use tokio::fs;
use tracing::debug;

use crate::handler::RequestHandler;
use crate::request::RequestContext;
use crate::responder::Responder;

/// Serves files from a configured root directory under `/static/{*path}`.
///
/// The captured suffix is rebuilt component by component, and only plain
/// segments are accepted: a suffix containing `..`, an absolute component or
/// a drive prefix is answered with 404 before the filesystem is touched, so
/// the resolved path can never leave the root.
///
/// Files are read whole into memory; there is no streaming and no range
/// support.
#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    root: PathBuf,
}

impl StaticFileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the captured path suffix against the root, or `None` when the
    /// suffix tries to step outside it.
    fn resolve(&self, rest: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(rest).components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl RequestHandler for StaticFileHandler {
    async fn invoke<'server, 'req>(&self, ctx: RequestContext<'server, 'req>) -> Response<Bytes> {
        let rest = ctx.params().get("path").unwrap_or("");

        let Some(file_path) = self.resolve(rest) else {
            debug!(path = rest, "rejected path stepping outside the static root");
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        };

        match fs::read(&file_path).await {
            Ok(contents) => {
                let mut response = Response::new(Bytes::from(contents));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    content_type_for(&file_path).as_ref().parse().expect("static content types are valid header values"),
                );
                response
            }
            Err(e) => {
                debug!(path = %file_path.display(), cause = %e, "static file not readable");
                (StatusCode::NOT_FOUND, "File not found").into_response()
            }
        }
    }
}

/// Content type from the file extension alone; anything unrecognized is
/// served as a generic binary blob.
fn content_type_for(path: &Path) -> Mime {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("html") => mime::TEXT_HTML,
        Some("css") => mime::TEXT_CSS,
        Some("js") => mime::APPLICATION_JAVASCRIPT,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use rill_http::protocol::RequestHead;

    fn testdata_handler() -> StaticFileHandler {
        StaticFileHandler::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata"))
    }

    /// Routes `path` the way the server would and invokes the static handler.
    async fn serve(path: &str) -> Response<Bytes> {
        let router = Router::builder().route("/static/{*path}", testdata_handler()).build();
        let matched = router.at(path).expect("path must match the static route");
        let head: RequestHead = http::Request::builder().uri(path).body(()).unwrap().into();
        let ctx = RequestContext::new(&head, matched.params());
        matched.handler().invoke(ctx).await
    }

    #[test]
    fn resolves_nested_paths_inside_the_root() {
        let handler = StaticFileHandler::new("/srv/www");
        assert_eq!(handler.resolve("css/site.css"), Some(PathBuf::from("/srv/www/css/site.css")));
        assert_eq!(handler.resolve("./index.html"), Some(PathBuf::from("/srv/www/index.html")));
    }

    #[test]
    fn rejects_traversal_and_absolute_components() {
        let handler = StaticFileHandler::new("/srv/www");
        assert_eq!(handler.resolve("../secret"), None);
        assert_eq!(handler.resolve("a/../../secret"), None);
        assert_eq!(handler.resolve("/etc/passwd"), None);
    }

    #[test]
    fn maps_extensions_to_content_types() {
        assert_eq!(content_type_for(Path::new("index.html")), mime::TEXT_HTML);
        assert_eq!(content_type_for(Path::new("site.css")), mime::TEXT_CSS);
        assert_eq!(content_type_for(Path::new("app.js")), mime::APPLICATION_JAVASCRIPT);
        assert_eq!(content_type_for(Path::new("logo.png")), mime::IMAGE_PNG);
        assert_eq!(content_type_for(Path::new("photo.jpg")), mime::IMAGE_JPEG);
        assert_eq!(content_type_for(Path::new("photo.jpeg")), mime::IMAGE_JPEG);
        assert_eq!(content_type_for(Path::new("archive.tar")), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("Makefile")), mime::APPLICATION_OCTET_STREAM);
    }

    #[tokio::test]
    async fn serves_a_file_with_its_content_type() {
        let response = serve("/static/index.html").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert!(response.body().starts_with(b"<!doctype html>"));
    }

    #[tokio::test]
    async fn serves_unknown_extensions_as_binary() {
        let response = serve("/static/data.bin").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    }

    #[tokio::test]
    async fn answers_404_for_a_missing_file() {
        let response = serve("/static/absent.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().as_ref(), b"File not found");
    }

    #[tokio::test]
    async fn answers_404_for_a_traversal_attempt() {
        let response = serve("/static/../Cargo.toml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().as_ref(), b"File not found");
    }
}
