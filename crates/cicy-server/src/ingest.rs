//! Token-protected ingestion of text and images (`POST /api/message`).

use axum::{Json, extract::State};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use cicy_core::{IMAGE_MIME_TYPE, Notification, format_size};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    AppState,
    error::ApiError,
    protocol::{ContentItem, ImageSource, IngestBody, SubmitResponse},
};

/// Accept a content array or a single legacy item.
///
/// In the array shape every item stands alone: unusable items are logged
/// and skipped. The legacy shape reports its one failure to the caller.
///
/// # Errors
/// Returns 400 for malformed or incomplete legacy bodies and failed
/// downloads, 500 if an image cannot be persisted.
pub async fn ingest_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let body: IngestBody =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid JSON"))?;

    if body.content.is_empty() {
        ingest_single(&state, &body.item).await?;
    } else {
        let total = body.content.len();
        let mut accepted = 0usize;
        for (index, raw) in body.content.into_iter().enumerate() {
            match ingest_batch_item(&state, raw).await {
                Ok(()) => accepted += 1,
                Err(reason) => warn!(index, %reason, "Skipped content item"),
            }
        }
        info!(accepted, total, "Processed content batch");
    }

    Ok(Json(SubmitResponse::ok("Message received")))
}

async fn ingest_batch_item(state: &AppState, raw: Value) -> Result<(), String> {
    let item: ContentItem = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    match item.kind.as_deref() {
        Some("text") => {
            let text = item.text().ok_or("missing text")?;
            store_text(state, text).map_err(|e| e.to_string())
        }
        Some("image") => {
            let source = item.image_source().ok_or("missing url or data")?;
            let bytes = load_image(state, source).await.map_err(|e| e.to_string())?;
            store_image(state, bytes).await.map_err(|e| e.to_string())
        }
        other => Err(format!("unsupported type {other:?}")),
    }
}

async fn ingest_single(state: &AppState, item: &ContentItem) -> Result<(), ApiError> {
    match item.kind.as_deref() {
        Some("text") => {
            let text = item.text().ok_or(ApiError::BadRequest("Text is required"))?;
            store_text(state, text)
        }
        Some("image") => {
            let source = item
                .image_source()
                .ok_or(ApiError::BadRequest("URL or Data is required"))?;
            let bytes = load_image(state, source).await?;
            store_image(state, bytes).await
        }
        _ => Err(ApiError::BadRequest("Invalid type")),
    }
}

fn store_text(state: &AppState, text: &str) -> Result<(), ApiError> {
    let id = state.store.append_text(text)?;
    info!(id, %text, "Ingested text");
    state.notifier.publish(Notification::text(text));
    Ok(())
}

async fn load_image(state: &AppState, source: ImageSource<'_>) -> Result<Vec<u8>, ApiError> {
    match source {
        ImageSource::Url(url) => {
            info!(%url, "Downloading image");
            Ok(state.fetcher.fetch(url).await?)
        }
        ImageSource::Inline(data) => STANDARD
            .decode(data.trim())
            .ok()
            .filter(|bytes| !bytes.is_empty())
            .ok_or(ApiError::BadRequest("URL or Data is required")),
    }
}

async fn store_image(state: &AppState, bytes: Vec<u8>) -> Result<(), ApiError> {
    let id = state
        .store
        .append_image(STANDARD.encode(&bytes), IMAGE_MIME_TYPE)?;
    let size_label = format_size(bytes.len());
    let path = state.images.persist(id, &bytes).await?;
    info!(id, size = %size_label, path = %path.display(), "Ingested image");
    state.notifier.publish(Notification::image(path, size_label));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn ingest(state: &AppState, body: Value) -> Result<Json<SubmitResponse>, ApiError> {
        ingest_message(State(state.clone()), Bytes::from(body.to_string())).await
    }

    #[tokio::test]
    async fn test_legacy_text() {
        let state = AppState::for_tests();
        let Json(response) = ingest(&state, json!({"type": "text", "text": "hello"}))
            .await
            .unwrap();
        assert_eq!(response, SubmitResponse::ok("Message received"));
        assert_eq!(state.store.list_text()[0].text, "hello");
    }

    #[tokio::test]
    async fn test_legacy_failures_are_bad_requests() {
        let state = AppState::for_tests();
        for body in [
            json!({"type": "text"}),
            json!({"type": "image"}),
            json!({"type": "image", "data": "%%% not base64"}),
            json!({"type": "video", "url": "x"}),
            json!({}),
        ] {
            let err = ingest(&state, body).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(state.store.counts().messages, 0);
        assert_eq!(state.store.counts().images, 0);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let state = AppState::for_tests();
        let err = ingest_message(State(state), Bytes::from_static(b"{oops"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_skips_unusable_items() {
        let state = AppState::for_tests();
        let mut rx = state.notifier.attach();

        let Json(response) = ingest(
            &state,
            json!({"content": [
                {"type": "text", "text": "first"},
                {"type": "text"},
                {"type": "image"},
                {"type": "audio", "data": "AAAA"},
                "not an object",
                {"type": "text", "text": "second"}
            ]}),
        )
        .await
        .unwrap();

        assert!(response.success);
        let texts: Vec<_> = state.store.list_text().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(rx.try_recv().unwrap(), Notification::text("first"));
        assert_eq!(rx.try_recv().unwrap(), Notification::text("second"));
    }

    #[tokio::test]
    async fn test_inline_image_is_stored_persisted_and_announced() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = AppState::for_tests();
        state.images = std::sync::Arc::new(crate::FsImageSink::new(tmp.path()));
        let mut rx = state.notifier.attach();

        let data = STANDARD.encode([7u8; 2048]);
        ingest(&state, json!({"type": "image", "data": data}))
            .await
            .unwrap();

        let images = state.store.list_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "image_1");
        assert_eq!(images[0].mime_type, IMAGE_MIME_TYPE);
        assert_eq!(images[0].data, data);

        let Notification::NewImage { path, size_label } = rx.try_recv().unwrap() else {
            panic!("expected an image notification");
        };
        assert_eq!(size_label, "2.00 KB");
        assert_eq!(std::fs::read(path).unwrap(), vec![7u8; 2048]);
    }
}
