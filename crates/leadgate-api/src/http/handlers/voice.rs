//! Voice endpoints: speech-to-text and text-to-speech proxying.
//!
//! Transcription expects the audio already transcoded to 16 kHz mono FLAC;
//! synthesis returns raw MP3 bytes rather than the JSON envelope.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use leadgate_core::speech::{SpeechToText, TextToSpeech};
use leadgate_types::speech::SynthesizeRequest;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/voice/transcribe - Transcribe an uploaded audio file.
///
/// Accepts multipart form data with the audio under an `audio` (or `file`)
/// field.
pub async fn transcribe(
    State(state): State<AppState>,
    _user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let mut audio: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if matches!(field.name(), Some("audio") | Some("file")) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read audio field: {e}")))?;
            audio = Some(bytes.to_vec());
        }
    }

    let audio = audio.ok_or_else(|| {
        AppError::Validation("multipart body must carry an 'audio' field".to_string())
    })?;

    let transcription = state.speech.transcribe(&audio).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::to_value(&transcription).unwrap(),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// POST /api/v1/voice/synthesize - Synthesize speech from text.
///
/// Returns the encoded audio bytes directly with an `audio/mpeg`
/// content type.
pub async fn synthesize(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<SynthesizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let audio = state.speech.synthesize(&body.text).await?;
    Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.audio))
}
