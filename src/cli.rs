use clap::Parser;
use ytsum::video::Quality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize a YouTube video's transcript with Gemini",
    version,
)]
pub struct Cli {
    /// YouTube video URL (reads from stdin if omitted)
    pub url: Option<String>,

    /// Maximum number of sentences in each summary (1-10)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub sentences: Option<u8>,

    /// Thumbnail image quality
    #[arg(short, long, value_enum)]
    pub quality: Option<Quality>,

    /// Preferred caption languages, in order
    #[arg(short, long, value_delimiter = ',')]
    pub lang: Option<Vec<String>>,

    /// Gemini model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum characters per transcript chunk
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk_size: Option<u32>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print the thumbnail URL; no API key or network needed
    #[arg(long)]
    pub thumbnail_only: bool,

    /// Show progress and diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
