pub mod import_service;
pub mod result_store;

pub use import_service::{FilteredQuestion, ImportOutcome, ImportService};
pub use result_store::{load_ignored_dimensions, save_ignored_dimensions, ResultStore};
