//! Upload progress channel.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{SinkExt, Stream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

use aniwa_core::error::{ChannelError, Error};
use aniwa_core::progress::ProgressEvent;
use aniwa_core::token::Token;
use aniwa_core::types::ServiceUrl;

use crate::http::endpoints::{PROGRESS_WS, ProgressFrame};

/// A stream of progress events for one in-flight upload.
///
/// One connection per upload attempt, authenticated with the current token.
/// The server pushes `{"progress": n}` frames; the stream yields the parsed
/// events and terminates deterministically: after the completion frame
/// (percent 100, a close frame is sent back), after a single transport error
/// item, or when the stream is dropped (which tears down the connection).
/// There is no reconnection; a failed upload is retried as a new attempt.
pub struct ProgressStream {
    inner: Pin<Box<dyn Stream<Item = Result<ProgressEvent, Error>> + Send>>,
}

impl ProgressStream {
    /// Open the progress channel for the given token.
    ///
    /// # Errors
    ///
    /// Returns a channel error if the WebSocket connection cannot be
    /// established.
    pub async fn open(service: &ServiceUrl, token: &Token) -> Result<Self, Error> {
        let ws_url = service.ws_url(&format!("{}?token={}", PROGRESS_WS, token.as_str()));
        info!(host = ?service.host(), "opening progress channel");

        let (ws_stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| ChannelError::Connect {
                message: e.to_string(),
            })?;

        debug!("progress channel connected");

        let stream = async_stream::stream! {
            let (mut write, mut read) = ws_stream.split();

            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ProgressFrame>(text.as_str()) {
                            Ok(frame) => {
                                let event = ProgressEvent::from_raw(frame.progress);
                                let done = event.is_done();
                                yield Ok(event);
                                if done {
                                    debug!("upload complete, closing channel");
                                    let _ = write.send(Message::Close(None)).await;
                                    break;
                                }
                            }
                            Err(e) => {
                                trace!(error = %e, "skipping unparseable frame");
                            }
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        trace!("received ping");
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            warn!(error = %e, "failed to send pong");
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        debug!(?frame, "channel closed by server");
                        break;
                    }
                    Ok(_) => {
                        // binary, pong, raw frames carry no progress
                    }
                    Err(e) => {
                        // reported once; the channel terminates
                        yield Err(ChannelError::Dropped {
                            message: e.to_string(),
                        }
                        .into());
                        break;
                    }
                }
            }
        };

        Ok(Self {
            inner: Box::pin(stream),
        })
    }
}

impl Stream for ProgressStream {
    type Item = Result<ProgressEvent, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
