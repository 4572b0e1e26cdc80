//! Futures resolving hash work that runs on a tokio task

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::{HashError, HashResult, Identifier, Result};

/// Input is fed to the hasher in chunks of this size, yielding in between.
const CHUNK_SIZE: usize = 8192;

/// Concrete async hash resolution result
pub struct AsyncHashResult {
    receiver: oneshot::Receiver<Result<HashResult>>,
}

/// Async hash result with a user-defined result handler
pub struct AsyncHashResultWithHandler<F> {
    receiver: oneshot::Receiver<Result<HashResult>>,
    handler: Option<F>,
    completed: bool,
}

/// Async hash result with error transformation
pub struct AsyncHashResultWithError<E> {
    receiver: oneshot::Receiver<Result<HashResult>>,
    error_handler: E,
}

impl AsyncHashResult {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<HashResult>>) -> Self {
        Self { receiver }
    }

    /// Create an `AsyncHashResult` that's already completed
    #[must_use]
    pub fn ready(result: Result<HashResult>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Create an `AsyncHashResult` that yields an error
    #[must_use]
    pub fn error(error: HashError) -> Self {
        Self::ready(Err(error))
    }

    /// Add a result handler
    pub fn on_result<F, T>(self, handler: F) -> AsyncHashResultWithHandler<F>
    where
        F: FnOnce(Result<HashResult>) -> T,
    {
        AsyncHashResultWithHandler {
            receiver: self.receiver,
            handler: Some(handler),
            completed: false,
        }
    }

    /// Transform errors, passing successful results through
    pub fn on_error<E>(self, error_handler: E) -> AsyncHashResultWithError<E>
    where
        E: Fn(HashError) -> HashError,
    {
        AsyncHashResultWithError {
            receiver: self.receiver,
            error_handler,
        }
    }
}

impl Future for AsyncHashResult {
    type Output = Result<HashResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                Poll::Ready(Err(HashError::internal("Hash resolution task dropped")))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F, T> Future for AsyncHashResultWithHandler<F>
where
    F: FnOnce(Result<HashResult>) -> T + Unpin,
{
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        // The receiver must not be polled again once it has yielded
        if this.completed {
            return Poll::Pending;
        }

        let result = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => Err(HashError::internal("Hash resolution task dropped")),
            Poll::Pending => return Poll::Pending,
        };
        this.completed = true;

        match this.handler.take() {
            Some(handler) => Poll::Ready(handler(result)),
            None => Poll::Pending,
        }
    }
}

impl<E> Future for AsyncHashResultWithError<E>
where
    E: Fn(HashError) -> HashError + Unpin,
{
    type Output = Result<HashResult>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result.map_err(&this.error_handler)),
            Poll::Ready(Err(_)) => Poll::Ready(Err((this.error_handler)(HashError::internal(
                "Hash resolution task dropped",
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Identifier {
    /// Hashes `data` on a tokio task, returning [`Identifier::size`] bytes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn compute<T: Into<Vec<u8>>>(self, data: T) -> AsyncHashResult {
        let mut hasher = match self.hasher() {
            Ok(hasher) => hasher,
            Err(e) => return AsyncHashResult::error(e),
        };
        let data = data.into();

        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            // Process data in chunks with yield points
            for chunk in data.chunks(CHUNK_SIZE) {
                hasher.write(chunk);
                tokio::task::yield_now().await;
            }

            let result = hasher
                .read(self.size())
                .map(|bytes| HashResult::new(self, bytes));
            let _ = tx.send(result);
        });

        AsyncHashResult::new(rx)
    }

    /// Computes the HMAC of `data` under `key` on a tokio task.
    ///
    /// Resolves to `HashError::WrongHashType` for extendable-output functions
    /// and `HashError::InvalidMacKeyLength` for keys longer than the digest.
    pub fn compute_mac<K, T>(self, key: K, data: T) -> AsyncHashResult
    where
        K: Into<Vec<u8>>,
        T: Into<Vec<u8>>,
    {
        let hasher = match self.fixed() {
            Ok(hasher) => hasher,
            Err(e) => return AsyncHashResult::error(e),
        };
        let key = zeroize::Zeroizing::new(key.into());
        let data = data.into();

        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            tokio::task::yield_now().await;

            let result = hasher
                .hmac(&data, &key)
                .map(|bytes| HashResult::new(self, bytes));
            let _ = tx.send(result);
        });

        AsyncHashResult::new(rx)
    }
}
