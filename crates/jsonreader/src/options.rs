//! Reader configuration (ambient addition, not a spec component): tunables
//! for the I/O-backed streaming adaptor (§4.J). The lazy-reader core itself
//! (scanner, handles, views, piece-table) has no configurable behaviour —
//! every option here only affects how aggressively [`crate::streaming::StreamingSource`]
//! grows its buffer while pumping.

/// Configuration for [`crate::streaming::StreamingSource`].
///
/// # Default
///
/// `streaming_initial_capacity` defaults to `0` (no pre-allocation);
/// `streaming_chunk_size` defaults to `4096`, matching a typical OS pipe
/// buffer size.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Bytes to reserve up front in the streaming buffer, if the caller has
    /// a size estimate for the document being streamed.
    ///
    /// # Default
    ///
    /// `0`
    pub streaming_initial_capacity: usize,

    /// Number of bytes requested per `read` call while pumping a streaming
    /// source for more input.
    ///
    /// # Default
    ///
    /// `4096`
    pub streaming_chunk_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            streaming_initial_capacity: 0,
            streaming_chunk_size: 4096,
        }
    }
}
