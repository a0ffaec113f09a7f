use std::fmt;

use log::{debug, info};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::llm::Completion;
use crate::report::Reporter;

pub const DEFAULT_MAP_PROMPT: &str = "다음 내용을 한국어로 요약하되, **최대 {max_sentences}문장 이내**로 요약 결과만 반환하고 추가 설명은 하지 마세요:\n\n{text}";

pub const DEFAULT_REDUCE_PROMPT: &str = "여러 부분 요약을 합쳐 **최대 {max_sentences}문장 이내**로 최종 요약 결과만 반환하고 추가 설명은 하지 마세요:\n\n{text}";

/// Separator between chunk summaries in the reduce prompt
const SUMMARY_SEPARATOR: &str = "\n\n";

/// Sentence cap for every summary, 1 to 10 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxSentences(u8);

impl MaxSentences {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for MaxSentences {
    fn default() -> Self {
        MaxSentences(3)
    }
}

impl TryFrom<u8> for MaxSentences {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(MaxSentences(n))
        } else {
            Err(Error::InvalidRequest(format!(
                "max sentences must be between {} and {}, got {n}",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl fmt::Display for MaxSentences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Prompt text with `{max_sentences}` and `{text}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        PromptTemplate(template.into())
    }

    /// `{text}` is substituted last so the input text is never rescanned.
    pub fn render(&self, max_sentences: MaxSentences, text: &str) -> String {
        self.0
            .replace("{max_sentences}", &max_sentences.to_string())
            .replace("{text}", text)
    }
}

#[derive(Debug, Clone)]
pub struct Prompts {
    pub map: PromptTemplate,
    pub reduce: PromptTemplate,
}

impl Default for Prompts {
    fn default() -> Self {
        Prompts {
            map: PromptTemplate::new(DEFAULT_MAP_PROMPT),
            reduce: PromptTemplate::new(DEFAULT_REDUCE_PROMPT),
        }
    }
}

/// Map phase: summarize each chunk on its own, one request at a time, in order.
///
/// The first failed request aborts the phase; no partial list is returned.
pub async fn summarize_chunks<C: Completion>(
    llm: &C,
    chunks: &[&str],
    max_sentences: MaxSentences,
    prompts: &Prompts,
    reporter: &mut impl Reporter,
) -> Result<Vec<String>> {
    let total = chunks.len();
    let mut summaries = Vec::with_capacity(total);

    for (idx, chunk) in chunks.iter().enumerate() {
        let current = idx + 1;
        let prompt = prompts.map.render(max_sentences, chunk);
        debug!("Map request {current}/{total}");

        reporter.progress(current, total);
        let text = llm
            .complete(&prompt)
            .await
            .map_err(|e| Error::completion(format!("chunk {current}/{total}"), e))?;

        summaries.push(text.trim().to_string());
    }

    info!("Summarized {total} chunks");
    Ok(summaries)
}

/// Reduce phase: merge the chunk summaries into a single summary.
///
/// The combined input is sent as one request regardless of its size.
pub async fn merge_summaries<C: Completion>(
    llm: &C,
    summaries: &[String],
    max_sentences: MaxSentences,
    prompts: &Prompts,
) -> Result<String> {
    let combined = summaries.join(SUMMARY_SEPARATOR);
    debug!(
        "Reduce request over {} summaries ({} chars)",
        summaries.len(),
        combined.chars().count()
    );

    let prompt = prompts.reduce.render(max_sentences, &combined);
    let text = llm
        .complete(&prompt)
        .await
        .map_err(|e| Error::completion("final summary", e))?;

    Ok(text.trim().to_string())
}
