use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form performance feedback for one completed session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedbackResult {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl FeedbackResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generated_at: Utc::now(),
        }
    }
}
