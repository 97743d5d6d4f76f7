//! Voice recorder for personalized voice messages.

use serde_json::Value;

use crate::domain::notification::Notification;
use crate::domain::recording::Recording;
use crate::repository::{FormSubmission, ResourceWriter};
use crate::services::notify::Notifier;
use crate::services::{ServiceError, ServiceResult};

pub const NO_DEVICE_MESSAGE: &str = "No device found for this operation!";

/// An open microphone stream.
pub trait AudioStream {
    /// Returns the next chunk of captured audio, or `None` when nothing is
    /// buffered.
    fn next_chunk(&mut self) -> Option<Vec<u8>>;
    fn stop(&mut self);
}

pub trait AudioDevice {
    type Stream: AudioStream;

    /// Asks for microphone permission. `None` when refused or unavailable.
    fn request_microphone(&mut self) -> Option<Self::Stream>;
}

pub struct VoiceRecorder<S> {
    stream: Option<S>,
    chunks: Vec<Vec<u8>>,
    recording: Option<Recording>,
}

impl<S> Default for VoiceRecorder<S> {
    fn default() -> Self {
        Self {
            stream: None,
            chunks: Vec::new(),
            recording: None,
        }
    }
}

impl<S> VoiceRecorder<S>
where
    S: AudioStream,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    /// The last finished recording.
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    /// Opens the microphone and starts buffering.
    pub fn start_recording<D, N>(&mut self, device: &mut D, ui: &N) -> ServiceResult<()>
    where
        D: AudioDevice<Stream = S>,
        N: Notifier + ?Sized,
    {
        if self.is_recording() {
            return Ok(());
        }
        match device.request_microphone() {
            Some(stream) => {
                log::info!("Recording started");
                self.chunks.clear();
                self.recording = None;
                self.stream = Some(stream);
                Ok(())
            }
            None => {
                log::warn!("Microphone unavailable");
                ui.alert(NO_DEVICE_MESSAGE);
                Err(ServiceError::PermissionDenied("microphone".to_string()))
            }
        }
    }

    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if self.is_recording() {
            self.chunks.push(chunk);
        }
    }

    /// Moves every chunk the stream has buffered into the recorder.
    pub fn drain(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            while let Some(chunk) = stream.next_chunk() {
                self.chunks.push(chunk);
            }
        }
    }

    /// Stops the microphone and assembles the buffered chunks.
    pub fn stop_recording(&mut self) -> ServiceResult<&Recording> {
        self.drain();
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| ServiceError::InvalidState("not recording".to_string()))?;
        stream.stop();

        let chunks = std::mem::take(&mut self.chunks);
        let recording = Recording::from_chunks(chunks);
        log::info!("Recording stopped ({} bytes)", recording.blob.len());
        Ok(&*self.recording.insert(recording))
    }

    /// Submits the recording as `field_name` alongside plain `fields` in one
    /// multipart request.
    pub fn upload<R, N>(
        &self,
        repo: &R,
        ui: &N,
        url: &str,
        field_name: &str,
        fields: &[(&str, &str)],
    ) -> ServiceResult<Value>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
    {
        let recording = self
            .recording
            .as_ref()
            .ok_or_else(|| ServiceError::InvalidState("nothing recorded".to_string()))?;

        let form = fields
            .iter()
            .fold(FormSubmission::new(), |form, (name, value)| {
                form.field(*name, *value)
            })
            .file(field_name, recording.file.clone());

        repo.submit_form(url, &form).map_err(|err| {
            log::error!("Failed to upload recording to {url}: {err}");
            ui.notify(Notification::error_occurred(&err));
            ServiceError::from(err)
        })
    }
}
