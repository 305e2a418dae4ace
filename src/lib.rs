use serde::{Deserialize, Serialize};

use extractor::YtDlpExtractor;

pub mod error;
pub mod extractor;
pub mod routes;

pub struct AppData {
    extractor: YtDlpExtractor,
}

impl AppData {
    pub fn new(extractor: YtDlpExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &YtDlpExtractor {
        &self.extractor
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    error: String,
}
