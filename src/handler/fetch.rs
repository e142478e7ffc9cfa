//! Byte sources behind the handlers.
//!
//! Handlers decode; where the raw bytes come from is this seam. The real
//! implementation reads from disk via tokio, the mock serves scripted
//! responses for tests.

use async_trait::async_trait;

use crate::error::FetchError;

/// Async source of raw resource bytes, keyed by locator URL.
///
/// Uses async-trait for dyn compatibility.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Filesystem-backed fetcher resolving URLs relative to a root directory.
#[cfg(feature = "runtime-tokio")]
pub struct FsFetcher {
    root: std::path::PathBuf,
}

#[cfg(feature = "runtime-tokio")]
impl FsFetcher {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(feature = "runtime-tokio")]
#[async_trait]
impl ByteFetcher for FsFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(self.root.join(url)).await?)
    }
}

enum MockResponse {
    Bytes(Vec<u8>),
    Fail(String),
}

/// In-memory fetcher for tests: scripted bytes or failures per URL.
///
/// Unknown URLs fail with a not-found io error. The invocation counter
/// lets tests assert that no fetch was ever started.
#[derive(Default)]
pub struct MockFetcher {
    responses: parking_lot::Mutex<std::collections::HashMap<String, MockResponse>>,
    fetches: std::sync::atomic::AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `url`.
    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Bytes(bytes));
    }

    /// Fail fetches of `url` with a decode-style message.
    pub fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Fail(message.into()));
    }

    /// Number of fetches attempted so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl ByteFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match self.responses.lock().get(url) {
            Some(MockResponse::Bytes(bytes)) => Ok(bytes.clone()),
            Some(MockResponse::Fail(message)) => Err(FetchError::Decode(message.clone())),
            None => Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no mock response for {url}"),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_serves_scripted_bytes() {
        let fetcher = MockFetcher::new();
        fetcher.insert("a.bin", vec![1, 2, 3]);

        let bytes = futures::executor::block_on(fetcher.fetch("a.bin")).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[test]
    fn mock_scripted_failure() {
        let fetcher = MockFetcher::new();
        fetcher.fail("b.bin", "truncated");

        let err = futures::executor::block_on(fetcher.fetch("b.bin")).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn mock_unknown_url_is_not_found() {
        let fetcher = MockFetcher::new();
        let err = futures::executor::block_on(fetcher.fetch("missing.bin")).unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
