use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::Deserialize;

use crate::pipeline::Options;
use crate::summarize::{MaxSentences, PromptTemplate, Prompts};
use crate::video::Quality;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub languages: Option<Vec<String>>,
    pub chunk_size: Option<usize>,
    pub max_sentences: Option<u8>,
    pub model: Option<String>,
    pub quality: Option<Quality>,
    pub secrets_path: Option<PathBuf>,
    pub map_prompt: Option<PromptTemplate>,
    pub reduce_prompt: Option<PromptTemplate>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.secrets_path.clone().unwrap_or_else(default_secrets_path)
    }

    /// Sentence cap: the CLI value wins over the config file, then the default.
    /// Validated here so a bad value fails before any key lookup or network use.
    pub fn max_sentences(&self, cli: Option<u8>) -> crate::Result<MaxSentences> {
        match cli.or(self.max_sentences) {
            Some(n) => MaxSentences::try_from(n),
            None => Ok(MaxSentences::default()),
        }
    }

    /// Pipeline options with config values applied over the defaults
    pub fn options(&self) -> Options {
        let defaults = Options::default();
        Options {
            languages: self.languages.clone().unwrap_or(defaults.languages),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            quality: self.quality.unwrap_or(defaults.quality),
            prompts: Prompts {
                map: self.map_prompt.clone().unwrap_or(defaults.prompts.map),
                reduce: self.reduce_prompt.clone().unwrap_or(defaults.prompts.reduce),
            },
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config")).join("ytsum")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_secrets_path() -> PathBuf {
    config_dir().join("secrets.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
languages = ["en", "ko"]
chunk_size = 2000
max_sentences = 5
model = "gemini-1.5-pro"
quality = "max"
secrets_path = "/etc/ytsum/secrets.toml"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.languages, Some(vec!["en".to_string(), "ko".to_string()]));
        assert_eq!(config.chunk_size, Some(2000));
        assert_eq!(config.max_sentences, Some(5));
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.quality, Some(Quality::Max));
        assert_eq!(config.secrets_path(), PathBuf::from("/etc/ytsum/secrets.toml"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.languages.is_none());
        assert!(config.model.is_none());

        let opts = config.options();
        assert_eq!(opts.languages, vec!["ko", "en"]);
        assert_eq!(opts.chunk_size, 3000);
        assert_eq!(opts.quality, Quality::High);
        assert_eq!(config.secrets_path(), default_secrets_path());
    }

    #[test]
    fn test_prompt_override() {
        let toml_str = r#"map_prompt = "Summarize in {max_sentences} sentences:\n\n{text}""#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let opts = config.options();
        let n = MaxSentences::try_from(2).unwrap();
        assert_eq!(opts.prompts.map.render(n, "body"), "Summarize in 2 sentences:\n\nbody");
        assert_eq!(opts.prompts.reduce, Prompts::default().reduce);
    }

    #[test]
    fn test_max_sentences_precedence_and_validation() {
        let config: Config = toml::from_str("max_sentences = 5").unwrap();
        assert_eq!(config.max_sentences(None).unwrap().get(), 5);
        assert_eq!(config.max_sentences(Some(2)).unwrap().get(), 2);
        assert_eq!(Config::default().max_sentences(None).unwrap().get(), 3);

        let config: Config = toml::from_str("max_sentences = 20").unwrap();
        assert!(matches!(config.max_sentences(None), Err(crate::Error::InvalidRequest(_))));
    }
}
