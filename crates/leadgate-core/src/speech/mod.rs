//! Speech provider abstractions.
//!
//! Traits for the speech-to-text and text-to-speech collaborators.
//! Implementations live in leadgate-infra (Google Cloud REST clients).
//! Audio arrives already transcoded (16 kHz mono FLAC); this layer only
//! adapts formats, it never transcodes.

use leadgate_types::speech::{SpeechError, SynthesizedAudio, Transcription};

/// Trait for speech-to-text backends.
pub trait SpeechToText: Send + Sync {
    /// Transcribe encoded audio bytes into text.
    fn transcribe(
        &self,
        audio: &[u8],
    ) -> impl std::future::Future<Output = Result<Transcription, SpeechError>> + Send;
}

/// Trait for text-to-speech backends.
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text into encoded audio bytes.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<SynthesizedAudio, SpeechError>> + Send;
}
