//! Ingest handler (`POST /qr/*`)
//!
//! Buffers the whole body, parses `{id, x, y, r}`, and hands
//! `{id: {x, y, r}}` to the sink. Nothing is remembered between requests.

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::payload::{IngestPayload, InvalidKey, OutboundMapping};
use crate::sink::SinkError;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ways an ingest request can fail
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Body is not JSON, or lacks `id`/`x`/`y`/`r`, or `id` cannot be a key.
    /// Answered with 500, not 400.
    #[error("Invalid JSON body: {0}.")]
    InvalidBody(String),

    #[error("Failed to read request body: {0}.")]
    BodyRead(String),

    #[error("Payload Too Large")]
    TooLarge,

    #[error("Failed to deliver payload: {0}.")]
    Delivery(#[from] SinkError),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody(err.to_string())
    }
}

impl From<InvalidKey> for IngestError {
    fn from(err: InvalidKey) -> Self {
        Self::InvalidBody(err.to_string())
    }
}

impl IngestError {
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::TooLarge => http::build_413_response(),
            _ => http::build_500_response(self.to_string()),
        }
    }
}

/// Handle a request already routed to ingest mode
pub async fn handle<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match ingest(req.into_body(), state).await {
        Ok(_) => http::build_success_response(),
        Err(err) => {
            logger::log_warning(&format!("Ingest rejected: {err}"));
            err.into_response()
        }
    }
}

/// Read, parse and deliver one payload
pub async fn ingest<B>(body: B, state: &AppState) -> Result<OutboundMapping, IngestError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let bytes = read_body(body, state.config.http.max_body_size).await?;
    let mapping = IngestPayload::from_slice(&bytes)?.into_mapping()?;

    state.sink.deliver(&mapping)?;
    logger::log_delivery(&mapping);

    Ok(mapping)
}

/// Collect every chunk of `body`, optionally capped at `limit` bytes
pub async fn read_body<B>(body: B, limit: Option<u64>) -> Result<Bytes, IngestError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let collected = match limit {
        None => body.collect().await.map_err(|e| {
            let err: BoxError = e.into();
            IngestError::BodyRead(err.to_string())
        })?,
        Some(limit) => {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            Limited::new(body, limit).collect().await.map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    IngestError::TooLarge
                } else {
                    IngestError::BodyRead(err.to_string())
                }
            })?
        }
    };

    Ok(collected.to_bytes())
}
