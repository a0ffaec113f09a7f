pub mod chunk;
pub mod config;
pub mod credential;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod summarize;
pub mod transcript;
pub mod video;

use serde::Serialize;

pub use error::{Error, Result};
pub use pipeline::{Options, Pipeline, Summary, SummaryRequest};

/// A single captioned segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}
