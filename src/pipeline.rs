use log::info;
use serde::Serialize;

use crate::chunk::{DEFAULT_MAX_CHARS, chunk_text};
use crate::error::{Error, Result};
use crate::llm::Completion;
use crate::report::Reporter;
use crate::summarize::{MaxSentences, Prompts, merge_summaries, summarize_chunks};
use crate::transcript::{CaptionProvider, DEFAULT_LANGUAGES, fetch_transcript};
use crate::video::{Quality, VideoId, extract_video_id, thumbnail_url};

/// One user-triggered summarization
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub video_url: String,
    pub max_sentences: MaxSentences,
}

impl SummaryRequest {
    pub fn new(video_url: impl Into<String>, max_sentences: u8) -> Result<Self> {
        Ok(SummaryRequest {
            video_url: video_url.into(),
            max_sentences: MaxSentences::try_from(max_sentences)?,
        })
    }
}

/// Settings shared by every run
#[derive(Debug, Clone)]
pub struct Options {
    pub languages: Vec<String>,
    pub chunk_size: usize,
    pub quality: Quality,
    pub prompts: Prompts,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            chunk_size: DEFAULT_MAX_CHARS,
            quality: Quality::default(),
            prompts: Prompts::default(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub video_id: VideoId,
    pub thumbnail_url: String,
    pub chunk_count: usize,
    pub chunk_summaries: Vec<String>,
    pub text: String,
}

/// Fetch, chunk, map and reduce, in that order, for one video.
pub struct Pipeline<'a, P, C> {
    captions: &'a P,
    llm: &'a C,
    options: &'a Options,
}

impl<'a, P: CaptionProvider, C: Completion> Pipeline<'a, P, C> {
    pub fn new(captions: &'a P, llm: &'a C, options: &'a Options) -> Self {
        Pipeline {
            captions,
            llm,
            options,
        }
    }

    /// A missing transcript ends the run before any completion request is made.
    /// Completion errors in either phase abort the run.
    pub async fn run(&self, request: &SummaryRequest, reporter: &mut impl Reporter) -> Result<Summary> {
        let video_id = extract_video_id(&request.video_url)
            .ok_or_else(|| Error::InvalidRequest(format!("no video ID in {:?}", request.video_url)))?;
        reporter.status(&format!("video: {video_id}"));

        let transcript = fetch_transcript(self.captions, &video_id, &self.options.languages, reporter).await;
        if transcript.is_empty() {
            return Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
            });
        }

        let chunks = chunk_text(&transcript, self.options.chunk_size);
        info!(
            "Transcript for {video_id}: {} chars in {} chunks",
            transcript.chars().count(),
            chunks.len()
        );

        let chunk_summaries = summarize_chunks(
            self.llm,
            &chunks,
            request.max_sentences,
            &self.options.prompts,
            reporter,
        )
        .await?;

        reporter.status("merging chunk summaries");
        let text = merge_summaries(self.llm, &chunk_summaries, request.max_sentences, &self.options.prompts).await?;

        Ok(Summary {
            thumbnail_url: thumbnail_url(&video_id, self.options.quality),
            video_id,
            chunk_count: chunks.len(),
            chunk_summaries,
            text,
        })
    }
}
