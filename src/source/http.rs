//! CSV over HTTP: one GET against the export endpoint

use std::time::Duration;

use tracing::debug;

use super::Source;
use super::csv::rows_from_reader;
use crate::core::RawRow;
use crate::error::AppError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: u64 = 100 * 1024 * 1024;

pub(crate) struct HttpCsvSource {
    url: String,
    delimiter: u8,
}

impl HttpCsvSource {
    pub(crate) fn new(url: String, delimiter: u8) -> Self {
        Self { url, delimiter }
    }

    fn fetch(&self) -> Result<String, AppError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build()
            .into();
        let mut response = agent.get(&self.url).header("Accept", "text/csv").call()?;
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()?;
        debug!(url = %self.url, bytes = body.len(), "fetched csv export");
        Ok(body)
    }
}

impl Source for HttpCsvSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<RawRow>, AppError> {
        let body = self.fetch()?;
        rows_from_reader(body.as_bytes(), self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_http_error() {
        // port 9 on localhost: nothing listens, connection is refused quickly
        let source = HttpCsvSource::new("http://127.0.0.1:9/orders.csv".into(), b',');
        let err = source.load().unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[test]
    fn location_is_url() {
        let source = HttpCsvSource::new("https://example.com/export".into(), b';');
        assert_eq!(source.location(), "https://example.com/export");
        assert_eq!(source.name(), "http");
    }
}
