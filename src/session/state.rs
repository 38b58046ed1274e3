use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::QuizItem;

/// One user's quiz on one topic. Created when a topic is submitted and
/// dropped on restart.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub topic: String,
    pub items: Vec<QuizItem>,
    pub started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            items: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn answered_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_answered()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_correct()).count()
    }

    /// Overwrites the choice for the item at `index`.
    pub fn select(&mut self, index: usize, option: usize) -> bool {
        self.items
            .get_mut(index)
            .is_some_and(|item| item.choose(option))
    }
}
