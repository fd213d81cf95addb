//! Shared HTTP plumbing for the remote backends.

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::BackendError;

/// Build a client honouring the configured request timeout.
pub(crate) fn build_client(config: &BackendConfig) -> Result<reqwest::Client, BackendError> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?)
}

/// Send a prepared request and return the JSON body.
///
/// Non-success statuses become `BackendError::Api` with the provider's own
/// error message when the body carries one. A success status with a body
/// that is not JSON keeps the body for the outcome's raw output.
pub(crate) async fn send_json(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<Value, BackendError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    debug!(provider, status = status.as_u16(), body_len = text.len(), "Provider responded");

    if !status.is_success() {
        return Err(api_error(provider, status, &text));
    }

    serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse {
        provider,
        message: e.to_string(),
        body: text,
    })
}

/// A parsed response that carried no usable text.
pub(crate) fn empty_response(provider: &'static str, body: &Value) -> BackendError {
    BackendError::EmptyResponse {
        provider,
        body: body.to_string(),
    }
}

/// Map an error response to `BackendError::Api`.
pub(crate) fn api_error(provider: &'static str, status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| body.trim().chars().take(500).collect());

    BackendError::Api {
        provider,
        status: status.as_u16(),
        message,
    }
}

/// Pull `error.message` (or a bare string `error`) out of an error body.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        err => err.get("message")?.as_str().map(str::to_string),
    }
}


/// One-shot HTTP server for exercising the backends against canned replies.
#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer the next request with `200 OK` and the given body, returning
    /// the server's base URL.
    pub(crate) async fn serve_once(content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    /// Drain the request head and its `Content-Length` body.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }
}
