//! Remote synthesis through the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short prompts, so text is cut into chunks of at most
//! [`MAX_CHUNK_CHARS`] characters and the MP3 bodies of the individual requests are
//! concatenated into one stream.

use super::{ensure_text, TtsEngine};
use crate::{config::GoogleTtsConfig, error::AppError};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

pub const MAX_CHUNK_CHARS: usize = 100;

const PUNCTUATION: &[char] = &[
    '?', '!', '？', '！', '.', ',', '¡', '(', ')', '[', ']', '¿', '…', '‥', '،', ';', ':', '—', '。',
    '，', '、', '：', '।', '॥', '\n',
];

pub struct GoogleTranslateTts {
    config: GoogleTtsConfig,
    client: Client,
}

impl TtsEngine for GoogleTranslateTts {
    type Config = GoogleTtsConfig;
    type Error = AppError;

    fn from_config(config: GoogleTtsConfig) -> Result<GoogleTranslateTts, AppError> {
        validate_lang(&config.lang)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    fn generate(&self, text: &str) -> Result<Vec<u8>, AppError> {
        ensure_text(text)?;
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AppError::EmptyText());
        }

        let mut buffer = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.request_url(chunk, idx, chunks.len())?;
            debug!("Requesting chunk {}/{} ({} chars)", idx + 1, chunks.len(), chunk.chars().count());
            let response = self
                .client
                .get(url)
                .header(reqwest::header::REFERER, "https://translate.google.com/")
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                error!("Remote synthesis failed with status {}", status);
                return Err(AppError::HttpStatusError(status.as_u16(), body));
            }
            buffer.extend_from_slice(&response.bytes()?);
        }

        if buffer.is_empty() {
            return Err(AppError::InvalidAudio(String::from("remote synthesis returned no audio")));
        }
        Ok(buffer)
    }
}

impl GoogleTranslateTts {
    pub fn request_url(&self, chunk: &str, idx: usize, total: usize) -> Result<Url, AppError> {
        let speed = if self.config.slow { "0.3" } else { "1" };
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let url = Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.config.lang.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
            ],
        )?;
        Ok(url)
    }
}

/// Languages the translate endpoint voices.
const LANGUAGES: &[&str] = &[
    "af", "am", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "eu",
    "fi", "fr", "fr-CA", "gl", "gu", "ha", "hi", "hr", "hu", "id", "is", "it", "iw", "ja", "jw",
    "km", "kn", "ko", "la", "lt", "lv", "ml", "mr", "ms", "my", "ne", "nl", "no", "pa", "pl", "pt",
    "pt-PT", "ro", "ru", "si", "sk", "sq", "sr", "su", "sv", "sw", "ta", "te", "th", "tl", "tr",
    "uk", "ur", "vi", "yue", "zh", "zh-CN", "zh-TW",
];

fn validate_lang(lang: &str) -> Result<(), AppError> {
    if LANGUAGES.iter().any(|known| known.eq_ignore_ascii_case(lang)) {
        Ok(())
    } else {
        Err(AppError::UnsupportedLanguage(lang.to_string()))
    }
}

/// Cuts `text` into request-sized chunks.
///
/// Pieces end after punctuation; a piece longer than `max_chars` is broken at its last
/// whitespace (or hard at the limit when there is none). Adjacent pieces are then merged while
/// they fit, and pieces with nothing to pronounce are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if PUNCTUATION.contains(&c) {
            pieces.push(std::mem::take(&mut current));
        }
    }
    pieces.push(current);

    let mut bounded = Vec::new();
    for piece in pieces {
        bounded.extend(break_long_piece(piece.trim(), max_chars));
    }

    let mut chunks: Vec<String> = Vec::new();
    for piece in bounded.into_iter().filter(|piece| is_pronounceable(piece)) {
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => chunks.push(piece),
        }
    }
    chunks
}

fn break_long_piece(piece: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest: Vec<char> = piece.chars().collect();
    while rest.len() > max_chars {
        let cut = rest[..=max_chars]
            .iter()
            .rposition(|c| c.is_whitespace())
            .filter(|pos| *pos > 0)
            .unwrap_or(max_chars);
        let head: String = rest[..cut].iter().collect();
        out.push(head.trim().to_string());
        rest = rest[cut..].to_vec();
        while rest.first().map_or(false, |c| c.is_whitespace()) {
            rest.remove(0);
        }
    }
    let tail: String = rest.into_iter().collect();
    out.push(tail.trim().to_string());
    out
}

fn is_pronounceable(piece: &str) -> bool {
    piece
        .chars()
        .any(|c| !c.is_whitespace() && !PUNCTUATION.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HINDI: &str = "नमस्ते, यह एक छह सेकंड का परीक्षण ऑडियो है जो हिंदी भाषा में है। कृपया इसे सुने और पहचानें।";

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text(HINDI, MAX_CHUNK_CHARS);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], HINDI);
    }

    #[test]
    fn long_text_is_split_on_punctuation_within_limit() {
        let text = "Hello, this is a test audio generated for six seconds duration. ".repeat(3);
        let chunks = split_text(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= MAX_CHUNK_CHARS));
        assert!(chunks.iter().all(|chunk| chunk.ends_with('.') || chunk.ends_with(',')));
        let rejoined: String = chunks.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn unpunctuated_runs_break_at_whitespace() {
        let text = "word ".repeat(50);
        let chunks = split_text(&text, 22);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 22));
        assert!(chunks.iter().all(|chunk| chunk.split(' ').all(|w| w == "word")));
    }

    #[test]
    fn runs_without_whitespace_break_hard() {
        let text = "x".repeat(250);
        let chunks = split_text(&text, MAX_CHUNK_CHARS);
        let lengths: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lengths, vec![100, 100, 50]);
    }

    #[test]
    fn punctuation_only_text_yields_nothing() {
        assert!(split_text("... , ।", MAX_CHUNK_CHARS).is_empty());
    }

    #[test]
    fn language_tags_are_validated() {
        assert!(validate_lang("hi").is_ok());
        assert!(validate_lang("zh-CN").is_ok());
        assert!(matches!(validate_lang(""), Err(AppError::UnsupportedLanguage(_))));
        assert!(validate_lang("hi&q=x").is_err());
        assert!(validate_lang("-en").is_err());
        assert!(validate_lang("HI").is_ok());
        assert!(matches!(validate_lang("xx"), Err(AppError::UnsupportedLanguage(_))));

        let unknown = GoogleTranslateTts::from_config(GoogleTtsConfig {
            lang: String::from("klingon"),
            ..Default::default()
        });
        assert!(matches!(unknown, Err(AppError::UnsupportedLanguage(_))));
    }

    #[test]
    fn request_url_carries_chunk_metadata() {
        let engine = GoogleTranslateTts::from_config(GoogleTtsConfig {
            slow: true,
            ..Default::default()
        })
        .expect("engine");
        let url = engine.request_url("नमस्ते", 1, 3).expect("url");
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("translate.google.com"));
        assert_eq!(query["q"], "नमस्ते");
        assert_eq!(query["tl"], "hi");
        assert_eq!(query["idx"], "1");
        assert_eq!(query["total"], "3");
        assert_eq!(query["textlen"], "6");
        assert_eq!(query["client"], "tw-ob");
        assert_eq!(query["ttsspeed"], "0.3");
    }

    #[test]
    fn empty_text_is_rejected_before_any_request() {
        let engine = GoogleTranslateTts::from_config(GoogleTtsConfig::default()).expect("engine");
        assert!(matches!(engine.generate(" "), Err(AppError::EmptyText())));
        assert!(matches!(engine.generate("।।"), Err(AppError::EmptyText())));
    }
}
