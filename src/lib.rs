pub mod analysis;
pub mod config;
pub mod errors;
pub mod extract;
pub mod input;
pub mod lang;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod report;

#[cfg(test)]
mod testing;

pub const USER_AGENT: &str = concat!("meddoc/", env!("CARGO_PKG_VERSION"));

pub use analysis::{AnalysisResult, Analyzer};
pub use errors::ErrorKind;
pub use extract::ExtractionResult;
pub use lang::Language;
pub use pipeline::{Pipeline, PipelineOutcome, RequestOptions, Stage};
pub use prompt::OutputMode;
