//! Captured voice notes and the files derived from them.

use chrono::{DateTime, Utc};

pub const RECORDING_MIME: &str = "audio/wav; codecs=MS_PCM";
pub const RECORDING_FILE_NAME: &str = "new_recording.wav";

/// File attached to a multipart form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
            last_modified: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A finished recording: the playable blob plus the upload-ready file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recording {
    pub blob: Vec<u8>,
    pub mime: &'static str,
    pub file: UploadFile,
}

impl Recording {
    /// Assembles buffered chunks, in arrival order, into a single recording.
    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        let blob = chunks.concat();
        let file = UploadFile::new(RECORDING_FILE_NAME, RECORDING_MIME, blob.clone());
        Self {
            blob,
            mime: RECORDING_MIME,
            file,
        }
    }
}
