//! Review API adapter (reqwest).
//!
//! Implements the `hwb-core` HomeworkSource port over the Practicum
//! `homework_statuses` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use hwb_core::{
    domain::Cursor,
    errors::{Error, FetchError},
    ports::HomeworkSource,
    Result,
};

const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct PracticumClient {
    token: String,
    endpoint: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(
        token: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self::with_http(token, endpoint, http))
    }

    pub fn with_http(
        token: impl Into<String>,
        endpoint: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            token: token.into(),
            endpoint: endpoint.into(),
            http,
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from: Cursor) -> std::result::Result<Value, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, from_date = from.timestamp(), "GET homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from.timestamp())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one canned HTTP response; yields the raw request head.
    async fn one_shot(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });

        (format!("http://{addr}/api/user_api/homework_statuses/"), handle)
    }

    fn client(endpoint: String) -> PracticumClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        PracticumClient::with_http("secret", endpoint, http)
    }

    #[tokio::test]
    async fn sends_oauth_header_and_from_date() {
        let (url, server) = one_shot("200 OK", r#"{"homeworks":[],"current_date":1000}"#).await;

        let v = client(url).fetch(Cursor::new(1234)).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(v["current_date"], 1000);
        assert!(request.starts_with("GET /api/user_api/homework_statuses/?from_date=1234 "));
        assert!(request
            .lines()
            .any(|l| l.eq_ignore_ascii_case("authorization: OAuth secret")));
    }

    #[tokio::test]
    async fn non_success_status_is_an_http_error() {
        let (url, server) = one_shot("401 Unauthorized", r#"{"code":"not_authenticated"}"#).await;

        let err = client(url).fetch(Cursor::new(0)).await.unwrap_err();
        server.await.unwrap();

        match err {
            FetchError::HttpStatus { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("not_authenticated"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let (url, server) = one_shot("200 OK", "<html>oops</html>").await;

        let err = client(url).fetch(Cursor::new(0)).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, FetchError::Decode(_)), "{err}");
    }

    #[tokio::test]
    async fn payload_is_returned_unvalidated() {
        let (url, server) = one_shot("200 OK", "[1,2,3]").await;

        let v = client(url).fetch(Cursor::new(0)).await.unwrap();
        server.await.unwrap();

        assert_eq!(v, serde_json::json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/"))
            .fetch(Cursor::new(0))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "{err}");
    }
}
