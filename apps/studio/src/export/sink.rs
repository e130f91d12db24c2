use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;

use crate::export::ExportError;

pub const PDF_MIME: &str = "application/pdf";

/// A finished file on its way to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

/// Where exported files are handed over for download.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, file: ExportFile) -> Result<(), ExportError>;
}

/// Keeps delivered files in memory; the HTTP layer drains it into a response.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<ExportFile>>,
}

impl MemorySink {
    pub fn take(&self) -> Vec<ExportFile> {
        match self.files.lock() {
            Ok(mut files) => std::mem::take(&mut *files),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn deliver(&self, file: ExportFile) -> Result<(), ExportError> {
        self.files
            .lock()
            .map_err(|_| ExportError::Delivery("download buffer poisoned".to_string()))?
            .push(file);
        Ok(())
    }
}
