pub mod flow;
pub mod state;

pub use flow::{FeedbackOutcome, FlowError, Phase, QuizFlow, RequestTicket};
pub use state::QuizSession;
