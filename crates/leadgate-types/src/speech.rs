//! Speech-to-text and text-to-speech types.
//!
//! The voice endpoints expect audio already transcoded to 16 kHz mono FLAC;
//! transcoding happens upstream of this backend.

use serde::{Deserialize, Serialize};

/// Result of a speech-to-text request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub transcript: String,
    /// Provider confidence for the top alternative, when reported.
    pub confidence: Option<f32>,
}

/// POST /voice/synthesize request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

/// Synthesized audio returned by the text-to-speech provider.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes (MP3).
    pub audio: Vec<u8>,
    /// MIME type of the payload.
    pub content_type: &'static str,
}

/// Errors from speech provider operations.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech provider error: {0}")]
    Provider(String),

    #[error("no speech recognized in the audio")]
    NoSpeechRecognized,

    #[error("invalid audio payload: {0}")]
    InvalidAudio(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::NoSpeechRecognized;
        assert_eq!(err.to_string(), "no speech recognized in the audio");
    }
}
