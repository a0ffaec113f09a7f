use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no usable Gemini API key: {0}")]
    Configuration(String),

    #[error("transcript unavailable for video {video_id}")]
    TranscriptUnavailable { video_id: String },

    #[error("completion request failed ({stage}): {reason}")]
    CompletionService { stage: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn completion(stage: impl Into<String>, err: eyre::Report) -> Self {
        let reason = err.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ");
        Error::CompletionService {
            stage: stage.into(),
            reason,
        }
    }
}
