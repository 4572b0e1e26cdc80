//! Incremental hashing over chunk streams
//!
//! Each input chunk is written into the hasher as soon as it arrives, so the
//! full message is never buffered.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;

use crate::{HashError, HashResult, HashType, Hasher, Identifier, Result};

pin_project! {
    /// Stream adapter that hashes chunks from `input` as they are polled
    pub struct StreamingHasher<S> {
        #[pin]
        input: S,
        hasher: Hasher,
        output_size: usize,
        finished: bool,
        total_bytes: u64,
    }
}

impl<S> StreamingHasher<S>
where
    S: Stream<Item = Vec<u8>>,
{
    /// Create a streaming hasher producing the standard output size of `algorithm`
    ///
    /// # Errors
    ///
    /// Returns `HashError::UnsupportedAlgorithm` if `algorithm` is not available.
    pub fn new(input: S, algorithm: Identifier) -> Result<Self> {
        let hasher = algorithm.hasher()?;
        Ok(Self {
            input,
            output_size: hasher.size(),
            hasher,
            finished: false,
            total_bytes: 0,
        })
    }

    /// Set the number of bytes read from an extendable-output function
    ///
    /// Fixed-output functions ignore this and always produce their standard size.
    ///
    /// # Errors
    ///
    /// Returns `HashError::OutputTooSmall` if `size` is below the standard
    /// size of an extendable-output function.
    pub fn with_output_size(mut self, size: usize) -> Result<Self> {
        if self.hasher.hash_type() == HashType::ExtendableOutputFunction
            && size < self.hasher.size()
        {
            return Err(HashError::OutputTooSmall {
                minimum: self.hasher.size(),
                requested: size,
            });
        }
        self.output_size = size;
        Ok(self)
    }

    /// Hash function in use
    pub fn algorithm(&self) -> Identifier {
        self.hasher.algorithm()
    }

    /// Get the total number of bytes processed so far
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

/// Result of streaming hash computation
#[derive(Debug, Clone)]
pub struct StreamHashResult {
    /// The final hash value
    pub hash: HashResult,
    /// Total bytes processed
    pub total_bytes: u64,
}

/// Chunk result from streaming hash computation
#[derive(Debug, Clone)]
pub struct StreamHashChunk {
    /// Bytes processed in this chunk
    pub bytes_processed: u64,
    /// Total bytes processed so far
    pub total_bytes: u64,
    /// Whether this is the final chunk with hash result
    pub is_final: bool,
    /// Final hash (only present if `is_final` = true)
    pub hash: Option<HashResult>,
}

impl<S> Stream for StreamingHasher<S>
where
    S: Stream<Item = Vec<u8>>,
{
    type Item = Result<StreamHashChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        match this.input.as_mut().poll_next(cx) {
            Poll::Ready(Some(chunk)) => {
                let chunk_size = chunk.len() as u64;
                *this.total_bytes += chunk_size;
                this.hasher.write(&chunk);

                Poll::Ready(Some(Ok(StreamHashChunk {
                    bytes_processed: chunk_size,
                    total_bytes: *this.total_bytes,
                    is_final: false,
                    hash: None,
                })))
            }
            Poll::Ready(None) => {
                *this.finished = true;
                let algorithm = this.hasher.algorithm();
                let total_bytes = *this.total_bytes;
                tracing::trace!(%algorithm, total_bytes, "finalizing streamed hash");

                let chunk = this.hasher.read(*this.output_size).map(|bytes| StreamHashChunk {
                    bytes_processed: 0,
                    total_bytes,
                    is_final: true,
                    hash: Some(HashResult::new(algorithm, bytes)),
                });
                Poll::Ready(Some(chunk))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Create a streaming hasher for `algorithm`
///
/// # Errors
///
/// Returns `HashError::UnsupportedAlgorithm` if `algorithm` is not available.
pub fn stream<S>(algorithm: Identifier, input: S) -> Result<StreamingHasher<S>>
where
    S: Stream<Item = Vec<u8>>,
{
    StreamingHasher::new(input, algorithm)
}

/// Drive a streaming hasher to completion and return the final hash
///
/// # Errors
///
/// Propagates any error from the stream, and returns `HashError::Internal`
/// if the stream ends without a final chunk.
pub async fn collect_hash<S>(mut hasher: StreamingHasher<S>) -> Result<StreamHashResult>
where
    S: Stream<Item = Vec<u8>> + Unpin,
{
    use futures::StreamExt;

    let mut total_bytes = 0;
    let mut final_hash = None;

    while let Some(chunk_result) = hasher.next().await {
        let chunk = chunk_result?;
        total_bytes = chunk.total_bytes;

        if chunk.is_final {
            final_hash = chunk.hash;
            break;
        }
    }

    let hash =
        final_hash.ok_or_else(|| HashError::internal("Stream ended without producing final hash"))?;

    Ok(StreamHashResult { hash, total_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::iter;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_streaming_matches_one_shot() {
        let chunks = vec![b"Hello, ".to_vec(), b"World!".to_vec()];
        let hasher = stream(Identifier::SHA256, iter(chunks)).unwrap();
        let result = collect_hash(hasher).await.unwrap();

        let expected = Identifier::SHA256.hash([b"Hello, World!"]).unwrap();
        assert_eq!(result.hash.as_bytes(), expected.as_slice());
        assert_eq!(result.hash.algorithm(), Identifier::SHA256);
        assert_eq!(result.total_bytes, 13);
    }

    #[tokio::test]
    async fn test_streaming_chunk_progress() {
        let chunks = vec![b"abc".to_vec(), b"defgh".to_vec()];
        let mut hasher = stream(Identifier::SHA3_256, iter(chunks)).unwrap();

        let first = hasher.next().await.unwrap().unwrap();
        assert_eq!(first.bytes_processed, 3);
        assert!(!first.is_final);
        assert!(first.hash.is_none());

        let second = hasher.next().await.unwrap().unwrap();
        assert_eq!(second.bytes_processed, 5);
        assert_eq!(second.total_bytes, 8);

        let last = hasher.next().await.unwrap().unwrap();
        assert!(last.is_final);
        assert_eq!(last.hash.unwrap().len(), 32);

        assert!(hasher.next().await.is_none());
    }

    #[tokio::test]
    async fn test_streaming_empty_input() {
        let hasher = stream(Identifier::SHA512, iter(Vec::<Vec<u8>>::new())).unwrap();
        let result = collect_hash(hasher).await.unwrap();

        let expected = Identifier::SHA512.hash(std::iter::empty::<&[u8]>()).unwrap();
        assert_eq!(result.hash.as_bytes(), expected.as_slice());
        assert_eq!(result.total_bytes, 0);
    }

    #[tokio::test]
    async fn test_streaming_extendable_output_size() {
        let chunks = vec![b"stream".to_vec(), b"ing".to_vec()];
        let hasher = stream(Identifier::SHAKE256, iter(chunks))
            .unwrap()
            .with_output_size(100)
            .unwrap();
        let result = collect_hash(hasher).await.unwrap();

        let mut xof = Identifier::SHAKE256.hasher().unwrap();
        let expected = xof.hash(100, [b"streaming"]).unwrap();
        assert_eq!(result.hash.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_streaming_rejects_short_extendable_output() {
        let hasher = stream(Identifier::SHAKE128, iter(Vec::<Vec<u8>>::new())).unwrap();
        assert!(matches!(
            hasher.with_output_size(8),
            Err(HashError::OutputTooSmall { minimum: 32, requested: 8 })
        ));
    }

    #[test]
    fn test_streaming_unavailable_algorithm() {
        let result = stream(Identifier::NONE, iter(Vec::<Vec<u8>>::new()));
        assert!(matches!(result, Err(HashError::UnsupportedAlgorithm(0))));
    }
}
