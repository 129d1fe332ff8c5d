//! Progress reporting collaborator contract.

/// Receives status messages and processed-batch increments during an apply.
///
/// The reporter is also the cancellation signal path: an external caller may
/// stop the operation between batches. A started batch always completes.
pub trait Progress: Send + Sync {
    /// Reports a human-readable status message.
    fn status(&self, message: &str);

    /// Reports `batches` additional processed batches.
    fn increment(&self, batches: u64);
}
