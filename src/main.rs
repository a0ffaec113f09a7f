use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytsum::credential;
use ytsum::llm::{DEFAULT_MODEL, GeminiClient};
use ytsum::report::{Console, Reporter};
use ytsum::transcript::InnerTube;
use ytsum::video::{extract_video_id, thumbnail_url};
use ytsum::{Error, Pipeline, SummaryRequest};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nURLS:\n  Trim everything after the video ID before pasting, e.g.\n  \
         https://www.youtube.com/watch?v=p2EGFTsXbyM&ab_channel=YTN -> https://youtu.be/p2EGFTsXbyM\n\n\
         API KEY (first found wins):\n  \
         1. built-in key (YTSUM_EMBEDDED_GEMINI_API_KEY at build time)\n  \
         2. [{}] {} in {}\n  \
         3. ${} environment variable\n  \
         4. interactive prompt (terminal only)\n\n\
         Logs are written to: {}",
        credential::SECRET_NAMESPACE,
        credential::SECRET_KEY,
        ytsum::config::default_secrets_path().display(),
        credential::ENV_VAR,
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        ytsum::config::Config::default()
    });

    let mut options = config.options();
    if let Some(langs) = cli.lang.clone() {
        options.languages = langs;
    }
    if let Some(size) = cli.chunk_size {
        options.chunk_size = size as usize;
    }
    if let Some(quality) = cli.quality {
        options.quality = quality;
    }
    let max_sentences = config.max_sentences(cli.sentences)?;
    let model = cli.model.clone().or_else(|| config.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    debug!("Options: {options:?}, max_sentences={max_sentences}, model={model}");

    let mut reporter = Console::new(io::stderr(), cli.verbose);

    // Collect URLs: from arg or stdin
    let from_stdin = cli.url.is_none();
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };
    let urls: Vec<String> = urls.into_iter().map(|u| u.trim().to_string()).filter(|u| !u.is_empty()).collect();

    if urls.is_empty() {
        bail!("no URL provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    if cli.thumbnail_only {
        for url in &urls {
            match extract_video_id(url) {
                Some(id) => println!("{}", thumbnail_url(&id, options.quality)),
                None => reporter.error(&format!("no video ID in {url:?}")),
            }
        }
        return Ok(());
    }

    let interactive = !from_stdin && io::stdin().is_terminal();
    let resolved = credential::resolve(credential::default_chain(config.secrets_path(), interactive), &mut reporter)?;

    let client = reqwest::Client::new();
    let llm = GeminiClient::new(client.clone(), resolved.credential, &model);
    let captions = InnerTube::new(client);
    let pipeline = Pipeline::new(&captions, &llm, &options);

    let mut failed = 0;
    for url in &urls {
        let request = SummaryRequest {
            video_url: url.clone(),
            max_sentences,
        };

        match pipeline.run(&request, &mut reporter).await {
            Ok(summary) => {
                let rendered = match cli.format {
                    OutputFormat::Text => ytsum::output::render_text(&summary),
                    OutputFormat::Json => ytsum::output::render_json(&summary),
                };
                println!("{rendered}");
            }
            // already reported by the fetcher
            Err(Error::TranscriptUnavailable { video_id }) => {
                debug!("Skipping {video_id}: no transcript");
                failed += 1;
            }
            Err(e) => {
                reporter.error(&e.to_string());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} videos could not be summarized", urls.len());
    }
    Ok(())
}
