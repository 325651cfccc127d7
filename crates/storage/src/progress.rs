// crates/storage/src/progress.rs
//! Upload progress reporting

use std::sync::Arc;

/// Progress of a multi-file upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadProgress {
    /// Files in the batch
    pub total_files: usize,
    /// Files uploaded successfully so far
    pub completed: usize,
    /// Files that failed so far
    pub failed: usize,
    /// Bytes sent for successful files
    pub bytes_uploaded: u64,
    /// Name of the file just processed
    pub current_file: Option<String>,
}

impl UploadProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    /// Files processed, successful or not
    pub fn processed(&self) -> usize {
        self.completed + self.failed
    }

    /// Percentage of files processed (0-100)
    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            return 100.0;
        }
        (self.processed() as f64 / self.total_files as f64) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.processed() >= self.total_files
    }

    pub(crate) fn record_success(&mut self, file: &str, bytes: u64) {
        self.completed += 1;
        self.bytes_uploaded += bytes;
        self.current_file = Some(file.to_string());
    }

    pub(crate) fn record_failure(&mut self, file: &str) {
        self.failed += 1;
        self.current_file = Some(file.to_string());
    }
}

/// Callback invoked after each file of an upload
pub type ProgressCallback = Arc<dyn Fn(&UploadProgress) + Send + Sync>;
