//! Stream control: a cancellable wrapper around response streams.

use crate::{BoxStream, Result};
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::debug;

/// Cancels a [`ControlledStream`] from anywhere, including another task.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves the stream running.
#[derive(Debug)]
pub struct CancelHandle {
    tx: oneshot::Sender<()>,
}

impl CancelHandle {
    /// Stop the stream. Its next poll returns `None` and the connection is released.
    pub fn cancel(self) {
        let _ = self.tx.send(());
    }
}

pub(crate) fn cancel_pair() -> (CancelHandle, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle { tx }, rx)
}

/// A response stream that owns its connection.
///
/// The connection is released when the stream ends, when it is dropped, on
/// [`ControlledStream::close`], or when its [`CancelHandle`] fires.
pub struct ControlledStream<'a, T> {
    inner: Option<BoxStream<'a, T>>,
    cancel_rx: Option<oneshot::Receiver<()>>,
}

impl<'a, T> ControlledStream<'a, T> {
    pub fn new(inner: BoxStream<'a, T>, cancel_rx: Option<oneshot::Receiver<()>>) -> Self {
        Self {
            inner: Some(inner),
            cancel_rx,
        }
    }

    /// Drop the underlying stream now. Later polls return `None`.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("response stream closed");
        }
        self.cancel_rx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl<'a, T> Stream for ControlledStream<'a, T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(rx) = this.cancel_rx.as_mut() {
            match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(())) => {
                    debug!("response stream cancelled");
                    this.close();
                    return Poll::Ready(None);
                }
                // Handle dropped without cancelling.
                Poll::Ready(Err(_)) => this.cancel_rx = None,
                Poll::Pending => {}
            }
        }

        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                this.close();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
