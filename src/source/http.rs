//! HTTP(S) source.
//!
//! The response body is returned whatever the status code. A 404 page or an
//! error body simply fails to parse downstream.

use bytes::Bytes;
use reqwest::Client;
use url::Url;

use super::{ConfigSource, FetchError, SourceError, SourceOptions};

/// GETs the document URL on every fetch.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: Client,
}

impl HttpSource {
    /// Build the source with its own client; the client is reused for every fetch.
    pub fn new(url: Url, options: &SourceOptions) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(options.fetch_timeout)
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self { url, client })
    }
}

impl ConfigSource for HttpSource {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(FetchError::Http)?;

        tracing::debug!(url = %self.url, status = %response.status(), "Config response received");

        response.bytes().await.map_err(FetchError::Http)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer, options: &SourceOptions) -> HttpSource {
        let url = Url::parse(&format!("{}/bounce.toml", server.uri())).unwrap();
        HttpSource::new(url, options).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bounce.toml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[[packages]]\n"))
            .mount(&server)
            .await;

        let source = source_for(&server, &SourceOptions::default());
        let bytes = source.fetch().await.unwrap();
        assert_eq!(&bytes[..], b"[[packages]]\n");
    }

    #[tokio::test]
    async fn test_error_status_body_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bounce.toml"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let source = source_for(&server, &SourceOptions::default());
        let bytes = source.fetch().await.unwrap();
        assert_eq!(&bytes[..], b"not here");
    }

    #[tokio::test]
    async fn test_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bounce.toml"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let options = SourceOptions {
            fetch_timeout: Duration::from_millis(100),
        };
        let source = source_for(&server, &options);
        assert!(matches!(source.fetch().await, Err(FetchError::Http(_))));
    }
}
