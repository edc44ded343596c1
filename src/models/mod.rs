pub mod generate;
pub mod loaders;
pub mod question;
pub mod validation;

pub use generate::{GenerateRequest, GenerateResponse};
pub use loaders::{load_all_json_files, load_json_to_questions};
pub use question::{
    Answer, ComparisonResult, GradeResponse, Question, QuestionEntry, QuestionResult, ScoreCard,
    ScoreCardDimension,
};
pub use validation::{validate_question, ValidationError};
