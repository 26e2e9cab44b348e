use async_trait::async_trait;
use forecast_core::CompanyRegistry;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{SpeechError, SpeechResult};
use crate::parser::{parse_command, ParsedCommand};

/// Speech-to-text backend.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe a WAV recording. `Ok(None)` means nothing was understood.
    async fn transcribe(&self, audio: &[u8]) -> SpeechResult<Option<String>>;

    fn backend_name(&self) -> &'static str;
}

/// Configuration for the speech-to-text service
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub language: String,
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("SPEECH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8006".to_string()),
            language: std::env::var("SPEECH_LANGUAGE").unwrap_or_else(|_| "en-US".to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Client for an HTTP transcription service.
///
/// `POST {base_url}/transcribe?language=..` with the raw WAV body, answered
/// by `{"text": "..."}`.
#[derive(Clone)]
pub struct HttpSpeechRecognizer {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl HttpSpeechRecognizer {
    pub fn new(config: SpeechConfig) -> SpeechResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language,
        })
    }

    /// Check service health
    pub async fn health(&self) -> SpeechResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechRecognizer {
    async fn transcribe(&self, audio: &[u8]) -> SpeechResult<Option<String>> {
        let response = self
            .client
            .post(format!("{}/transcribe", self.base_url))
            .query(&[("language", self.language.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(audio.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeechError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        transcript_from_body(&body)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

fn transcript_from_body(body: &str) -> SpeechResult<Option<String>> {
    let parsed: TranscriptionResponse =
        serde_json::from_str(body).map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

    Ok(parsed
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

/// Transcribe `audio` and interpret the result.
///
/// Empty audio skips the recognizer. A failed or empty transcription is
/// logged and yields the default command; nothing is propagated.
pub async fn recognize_and_parse(
    recognizer: &dyn SpeechRecognizer,
    audio: &[u8],
    registry: &CompanyRegistry,
) -> ParsedCommand {
    if audio.is_empty() {
        return ParsedCommand::empty();
    }

    let text = match recognizer.transcribe(audio).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "Speech recognition via {} failed: {}",
                recognizer.backend_name(),
                e
            );
            None
        }
    };

    if text.is_none() {
        tracing::info!("No speech recognized in {} bytes of audio", audio.len());
    }

    parse_command(text.as_deref(), registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRecognizer {
        text: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedRecognizer {
        fn new(text: Option<&'static str>) -> Self {
            Self {
                text,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        async fn transcribe(&self, _audio: &[u8]) -> SpeechResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.map(str::to_string))
        }

        fn backend_name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl SpeechRecognizer for FailingRecognizer {
        async fn transcribe(&self, _audio: &[u8]) -> SpeechResult<Option<String>> {
            Err(SpeechError::ServiceUnavailable("Status: 503".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_empty_audio_skips_recognizer() {
        let recognizer = FixedRecognizer::new(Some("apu 90 days"));
        let cmd = recognize_and_parse(&recognizer, &[], &CompanyRegistry::MSE).await;
        assert_eq!(cmd, ParsedCommand::empty());
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcript_is_parsed() {
        let recognizer = FixedRecognizer::new(Some("APU 90 days"));
        let cmd = recognize_and_parse(&recognizer, b"RIFF", &CompanyRegistry::MSE).await;
        assert_eq!(cmd.ticker.as_deref(), Some("APU"));
        assert_eq!(cmd.horizon.days(), 90);
        assert_eq!(cmd.text.as_deref(), Some("APU 90 days"));
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_speech_falls_back() {
        let recognizer = FixedRecognizer::new(None);
        let cmd = recognize_and_parse(&recognizer, b"RIFF", &CompanyRegistry::MSE).await;
        assert_eq!(cmd, ParsedCommand::empty());
    }

    #[tokio::test]
    async fn test_recognizer_error_falls_back() {
        let cmd = recognize_and_parse(&FailingRecognizer, b"RIFF", &CompanyRegistry::MSE).await;
        assert_eq!(cmd, ParsedCommand::empty());
    }

    #[test]
    fn test_transcript_from_body() {
        assert_eq!(
            transcript_from_body(r#"{"text": "  golomt bank next 5 years "}"#).unwrap(),
            Some("golomt bank next 5 years".to_string())
        );
        assert_eq!(transcript_from_body(r#"{"text": "   "}"#).unwrap(), None);
        assert_eq!(transcript_from_body(r#"{}"#).unwrap(), None);
        assert!(matches!(
            transcript_from_body("not json"),
            Err(SpeechError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_recognizer_trims_base_url() {
        let recognizer = HttpSpeechRecognizer::new(SpeechConfig {
            base_url: "http://localhost:8006/".to_string(),
            language: "en-US".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(recognizer.base_url, "http://localhost:8006");
    }
}
