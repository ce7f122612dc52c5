//! Google Cloud speech clients (REST, API-key auth).
//!
//! One client implements both directions: `speech:recognize` for
//! transcription and `text:synthesize` for synthesis. Audio payloads ride
//! base64-encoded inside the JSON bodies, per the REST API contract.
//! Incoming audio must already be 16 kHz mono FLAC; this client never
//! transcodes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use leadgate_core::speech::{SpeechToText, TextToSpeech};
use leadgate_types::config::SpeechConfig;
use leadgate_types::speech::{SpeechError, SynthesizedAudio, Transcription};

const RECOGNIZE_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";
const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Google Cloud REST client for both speech directions.
///
/// Does NOT derive Debug so the API key cannot leak through logging.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    api_key: SecretString,
    config: SpeechConfig,
}

impl GoogleSpeechClient {
    pub fn new(api_key: SecretString, config: SpeechConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        }
    }
}

// --- Wire types -------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Deserialize)]
struct RecognizeAlternative {
    transcript: String,
    confidence: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeApiRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeApiResponse {
    audio_content: String,
}

// --- Trait implementations --------------------------------------------------

impl SpeechToText for GoogleSpeechClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("empty audio payload".to_string()));
        }

        let body = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "FLAC",
                sample_rate_hertz: self.config.sample_rate_hertz,
                language_code: &self.config.language_code,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio),
            },
        };

        let response = self
            .http
            .post(RECOGNIZE_URL)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider(format!(
                "recognize returned {status}: {text}"
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Provider(e.to_string()))?;

        let alternative = parsed
            .results
            .into_iter()
            .next()
            .and_then(|r| r.alternatives.into_iter().next())
            .ok_or(SpeechError::NoSpeechRecognized)?;

        debug!(
            confidence = ?alternative.confidence,
            "Transcribed audio payload"
        );

        Ok(Transcription {
            transcript: alternative.transcript,
            confidence: alternative.confidence,
        })
    }
}

impl TextToSpeech for GoogleSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidAudio("empty text".to_string()));
        }

        let body = SynthesizeApiRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language_code,
                name: &self.config.voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .http
            .post(SYNTHESIZE_URL)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider(format!(
                "synthesize returned {status}: {text}"
            )));
        }

        let parsed: SynthesizeApiResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Provider(e.to_string()))?;

        let audio = BASE64
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| SpeechError::Provider(format!("invalid base64 audio: {e}")))?;

        Ok(SynthesizedAudio {
            audio,
            content_type: "audio/mpeg",
        })
    }
}
