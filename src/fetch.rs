//! Retrieves the raw HTML of the word-of-the-day page.
//!
//! One HTTP GET per run, no timeout, no retry, no caching. A failed fetch is
//! the pipeline's only recoverable outcome: it maps to [`Error::Fetch`] so the
//! caller can exit quietly instead of treating it as a bug.

use crate::{Error, Result};
use log::debug;
use reqwest::blocking::Client;

/// The fixed source page. There is exactly one supported site; the selectors
/// in [`crate::extract`] are coupled to its markup.
pub const SOURCE_URL: &str = "https://www.dictionary.com/e/word-of-the-day/";

/// Blocking HTTP fetcher for the source page.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Init(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Perform the single GET and return the response body as text.
    pub fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Fetch(format!("HTTP GET failed: {}", e)))?;

        let body = res
            .text()
            .map_err(|e| Error::Fetch(format!("Failed to read response body: {}", e)))?;

        debug!("fetched {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_returns_body() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();

        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response =
                    tiny_http::Response::from_string("<html><body>word of the day</body></html>");
                let _ = request.respond(response);
            }
        });

        let url = format!("http://{}", addr);
        let fetcher = Fetcher::new().expect("Failed to build fetcher");
        let body = fetcher.fetch(&url).expect("Fetch failed");
        assert!(body.contains("word of the day"));
    }

    #[test]
    fn connection_failure_is_a_fetch_error() {
        // Bind a listener to reserve a port, then drop it so nothing answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = Fetcher::new().expect("Failed to build fetcher");
        let err = fetcher
            .fetch(&format!("http://{}", addr))
            .expect_err("Fetch against a dead port should fail");
        assert!(err.is_fetch(), "expected a fetch error, got {:?}", err);
    }
}
