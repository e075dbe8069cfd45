//! HTTP catalog service for doccat.
//!
//! Exposes upload, list, download, and delete over a blob store directory,
//! plus a metadata search passed through to an external search engine.
//! Request handlers are stateless; the blob store and the search index are
//! injected as trait objects so either can be swapped for an in-memory fake.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use catalog::CatalogService;
pub use config::{DuplicatePolicy, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::{shutdown_signal, CatalogServer};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use doccat_index::InMemorySearchIndex;
    use doccat_store::FsBlobStore;
    use serde_json::Value;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "doccat-test-boundary";

    struct Harness {
        app: Router,
        index: Arc<InMemorySearchIndex>,
        _dir: tempfile::TempDir,
    }

    fn harness(policy: DuplicatePolicy) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(FsBlobStore::new(dir.path()).unwrap());
        let index = Arc::new(InMemorySearchIndex::new());
        let config = ServerConfig {
            duplicate_policy: policy,
            ..Default::default()
        };
        let server = CatalogServer::with_backends(config, blobs, index.clone());
        Harness {
            app: server.router(),
            index,
            _dir: dir,
        }
    }

    /// `(field, filename, content type, bytes)` parts as a multipart body.
    fn multipart(parts: &[(&str, Option<&str>, &str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, filename, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match filename {
                Some(f) => format!("form-data; name=\"{field}\"; filename=\"{f}\""),
                None => format!("form-data; name=\"{field}\""),
            };
            body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn upload(app: &Router, files: &[(&str, &str, &str)]) -> Response {
        let parts: Vec<_> = files
            .iter()
            .map(|(name, ct, data)| ("files", Some(*name), *ct, *data))
            .collect();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart(&parts)))
            .unwrap();
        send(app, req).await
    }

    async fn get(app: &Router, uri: &str) -> Response {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn delete(app: &Router, uri: &str) -> Response {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(app, req).await
    }

    async fn json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn search_names(app: &Router, uri: &str) -> Vec<String> {
        let resp = get(app, uri).await;
        assert_eq!(resp.status(), StatusCode::OK);
        json(resp).await["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["filename"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn home_endpoint() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = get(&h.app, "/").await;
        assert_eq!(resp.status(), 200);
        assert!(json(resp).await["message"].as_str().unwrap().contains("Welcome"));
    }

    #[tokio::test]
    async fn upload_then_download_is_identical() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let content = "%PDF-1.4 binary \x00\x01\x02 payload";
        let resp = upload(&h.app, &[("report.pdf", "application/pdf", content)]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json(resp).await,
            serde_json::json!({ "uploaded_files": [ { "filename": "report.pdf", "status": "success" } ] })
        );

        let resp = get(&h.app, "/files/report.pdf").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report.pdf\""
        );
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], content.len().to_string().as_str());
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), content.as_bytes());
    }

    #[tokio::test]
    async fn multi_file_upload_indexes_each() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = upload(
            &h.app,
            &[("a.txt", "text/plain", "a"), ("b.png", "image/png", "b")],
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["uploaded_files"].as_array().unwrap().len(), 2);

        let docs = h.index.documents().await;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].content_type.as_deref(), Some("image/png"));
        assert_eq!(docs[1].size, 1);
    }

    #[tokio::test]
    async fn list_shows_each_file_once() {
        let h = harness(DuplicatePolicy::Always);
        upload(&h.app, &[("b.txt", "text/plain", "1")]).await;
        upload(&h.app, &[("a.txt", "text/plain", "2")]).await;
        upload(&h.app, &[("a.txt", "text/plain", "3")]).await;

        let resp = get(&h.app, "/files/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json(resp).await, serde_json::json!({ "files": ["a.txt", "b.txt"] }));
        // Two documents for a.txt under the "always" policy, one blob.
        assert_eq!(h.index.count("a.txt").await, 2);
    }

    #[tokio::test]
    async fn sequential_reupload_indexes_once() {
        let h = harness(DuplicatePolicy::SkipExisting);
        upload(&h.app, &[("a.txt", "text/plain", "1")]).await;
        upload(&h.app, &[("a.txt", "text/plain", "2")]).await;
        assert_eq!(h.index.count("a.txt").await, 1);
    }

    #[tokio::test]
    async fn download_missing_is_404() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = get(&h.app, "/files/missing.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(json(resp).await["detail"].as_str().unwrap().starts_with("File not found"));
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let h = harness(DuplicatePolicy::SkipExisting);
        for uri in ["/files/..%2Fsecret", "/files/..", "/files/.hidden", "/files/a%5Cb"] {
            let resp = get(&h.app, uri).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        let resp = delete(&h.app, "/files/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_unsafe_filename() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = upload(&h.app, &[("../escape.txt", "text/plain", "x")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(h.index.documents().await.is_empty());
    }

    #[tokio::test]
    async fn upload_without_files_is_400() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart(&[("note", None, "text/plain", "hi")])))
            .unwrap();
        let resp = send(&h.app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_part_without_filename_is_400() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart(&[("files", None, "text/plain", "hi")])))
            .unwrap();
        let resp = send(&h.app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_from_list_and_search() {
        let h = harness(DuplicatePolicy::SkipExisting);
        upload(&h.app, &[("report.pdf", "application/pdf", "x")]).await;
        assert_eq!(search_names(&h.app, "/search/?query=report").await, vec!["report.pdf"]);

        let resp = delete(&h.app, "/files/report.pdf").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json(resp).await["message"],
            "File 'report.pdf' has been deleted"
        );

        let listed = json(get(&h.app, "/files/").await).await;
        assert_eq!(listed["files"], serde_json::json!([]));
        assert!(search_names(&h.app, "/search/?query=report").await.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_404() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = delete(&h.app, "/files/never-uploaded.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_by_text() {
        let h = harness(DuplicatePolicy::SkipExisting);
        upload(
            &h.app,
            &[
                ("Annual-Report.pdf", "application/pdf", "1"),
                ("photo.jpg", "image/jpeg", "2"),
                ("report.txt", "text/plain", "3"),
            ],
        )
        .await;
        assert_eq!(
            search_names(&h.app, "/search/?query=report").await,
            vec!["Annual-Report.pdf", "report.txt"]
        );
    }

    #[tokio::test]
    async fn search_by_content_type_without_query() {
        let h = harness(DuplicatePolicy::SkipExisting);
        upload(
            &h.app,
            &[
                ("a.png", "image/png", "1"),
                ("b.jpg", "image/jpeg", "2"),
                ("c.png", "image/png", "3"),
            ],
        )
        .await;
        assert_eq!(
            search_names(&h.app, "/search/?query=&content_type=image%2Fpng").await,
            vec!["a.png", "c.png"]
        );
    }

    #[tokio::test]
    async fn search_by_date_range() {
        let h = harness(DuplicatePolicy::SkipExisting);
        upload(&h.app, &[("today.txt", "text/plain", "1")]).await;

        assert_eq!(
            search_names(&h.app, "/search/?start_date=2000-01-01&end_date=2999-12-31").await,
            vec!["today.txt"]
        );
        assert!(search_names(&h.app, "/search/?start_date=2000-01-01&end_date=2000-01-02")
            .await
            .is_empty());
        // A lone bound is ignored.
        assert_eq!(
            search_names(&h.app, "/search/?end_date=2000-01-02").await,
            vec!["today.txt"]
        );
    }

    #[tokio::test]
    async fn search_with_bad_date_is_400() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let resp = get(&h.app, "/search/?start_date=soon&end_date=later").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_index_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let server = CatalogServer::with_backends(
            ServerConfig::default(),
            Arc::new(FsBlobStore::new(dir.path()).unwrap()),
            Arc::new(catalog::tests::DownIndex),
        );
        let resp = get(&server.router(), "/search/?query=x").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn cors_headers_present() {
        let h = harness(DuplicatePolicy::SkipExisting);
        let req = Request::builder()
            .uri("/files/")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let resp = send(&h.app, req).await;
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            max_upload_size: 64,
            ..Default::default()
        };
        let server = CatalogServer::with_backends(
            config,
            Arc::new(FsBlobStore::new(dir.path()).unwrap()),
            Arc::new(InMemorySearchIndex::new()),
        );
        let big = "x".repeat(4096);
        let resp = upload(&server.router(), &[("big.bin", "application/octet-stream", big.as_str())]).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
