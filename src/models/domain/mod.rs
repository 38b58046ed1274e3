pub mod feedback;
pub mod quiz_item;
pub use feedback::FeedbackResult;
pub use quiz_item::QuizItem;
