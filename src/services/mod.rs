pub mod diagnostics_writer;
pub mod fact_service;
pub mod llm_service;
pub mod order_service;
pub mod quiz_service;

pub use diagnostics_writer::DiagnosticsWriter;
pub use fact_service::FactService;
pub use llm_service::{LlmService, TextGenerator};
pub use order_service::OrderBook;
pub use quiz_service::{QuizBatch, QuizService, QuizSource, QuizWarning, DEFAULT_QUESTION_COUNT};
