pub mod grading_client;

pub use grading_client::{GradingClient, QuestionGrader};
