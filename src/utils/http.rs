// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Accept header sent by the product page's own AJAX calls.
pub const AJAX_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Create a configured asynchronous HTTP client.
///
/// The timeout bounds every request made with the client, so neither the
/// product fetch nor the notification can block indefinitely.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Headers that identify a request as an in-page AJAX call.
pub fn ajax_headers(referer: &Url) -> Result<HeaderMap> {
    let referer = HeaderValue::from_str(referer.as_str())
        .map_err(|e| AppError::config(format!("invalid referer '{referer}': {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(AJAX_ACCEPT));
    headers.insert(
        "x-requested-with",
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(REFERER, referer);
    Ok(headers)
}

/// One-shot local HTTP server for exercising real requests in tests.
#[cfg(test)]
pub(crate) mod stub_server {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Serve a single request with `status` and `body` after `delay`.
    ///
    /// Returns the server's base URL, e.g. `http://127.0.0.1:41234`.
    pub async fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}")
    }

    /// Consume request head and body so closing the socket does not reset it.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                return;
            }
        }
    }
}
