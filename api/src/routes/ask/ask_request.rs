use serde::{Deserialize, Serialize};

/// Request payload for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question. Absent means the empty string.
    #[serde(default)]
    pub question: String,
}

/// Response payload for `POST /ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer, verbatim.
    pub answer: String,
}
