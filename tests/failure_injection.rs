//! Failure injection: broken routing documents and unreachable sources.

use axum::http::StatusCode;
use importbounce::config::ServiceConfig;
use importbounce::lifecycle::{startup, StartupError};
use importbounce::source::SourceError;
use reqwest::header::HOST;

mod common;

use common::{client, start_server, FOO_DOCUMENT};

#[tokio::test]
async fn test_malformed_document_is_500() {
    let server = start_server("[[packages]\nprefix = ").await;

    let res = client()
        .get(server.url("/foo"))
        .header(HOST, "go.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_prefix_document_is_500() {
    let server = start_server(
        "[[packages]]\nprefix = \"\"\nimport = \"git https://github.com/x/all\"\nredirect = \"https://github.com/x/all\"\n",
    )
    .await;

    let res = client()
        .get(server.url("/foo"))
        .header(HOST, "go.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_document_is_500() {
    let server = start_server(FOO_DOCUMENT).await;
    std::fs::remove_file(server.document.path()).unwrap();

    let res = client()
        .get(server.url("/foo?go-get=1"))
        .header(HOST, "go.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recovers_after_document_fixed() {
    let server = start_server("not toml at all [").await;

    let res = client()
        .get(server.url("/foo"))
        .header(HOST, "go.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    server.rewrite_document(FOO_DOCUMENT);

    let res = client()
        .get(server.url("/foo"))
        .header(HOST, "go.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_unknown_scheme_is_fatal_at_startup() {
    let mut config = ServiceConfig::default();
    config.source.url = "gopher://example.com/bounce.toml".into();

    let err = startup::build_server(&config).await.err().unwrap();
    assert!(matches!(
        err,
        StartupError::Source(SourceError::UnknownScheme(ref s)) if s == "gopher"
    ));
}

#[tokio::test]
async fn test_empty_url_is_fatal_at_startup() {
    let config = ServiceConfig::default();

    let err = startup::build_server(&config).await.err().unwrap();
    assert!(matches!(err, StartupError::Source(SourceError::MissingUrl)));
}
