//! Response bodies shared by handlers.

use serde::Serialize;

/// Acknowledgment for a stored submission.
#[derive(Debug, Serialize)]
pub struct SubmitAck {
    pub status: &'static str,
    pub id: String,
}

impl SubmitAck {
    pub fn ok(id: String) -> Self {
        SubmitAck { status: "ok", id }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}
