use crate::domain::ports::Redirector;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Stands in for browser navigation by writing the target URL to a sink.
pub struct ConsoleRedirector<W: Write + Send> {
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send> ConsoleRedirector<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl ConsoleRedirector<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send> Redirector for ConsoleRedirector<W> {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|e| CheckoutError::Navigation(e.to_string()))?;
        writeln!(out, "Redirecting to {}", url)
            .and_then(|_| out.flush())
            .map_err(|e| CheckoutError::Navigation(e.to_string()))
    }
}
