//! Query request types

use serde::{Deserialize, Serialize};

/// Question submitted to `POST /api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
}

/// Query string of the interactive page (`GET /?q=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub q: Option<String>,
}

impl PageQuery {
    /// The submitted question, if any non-blank text was entered
    pub fn question(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
