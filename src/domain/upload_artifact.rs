use std::path::Path;

use super::audio_format::{AudioFormat, extension_of};

const FALLBACK_STEM: &str = "audio";

/// A single upload, held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadArtifact {
    pub data: Vec<u8>,
    pub declared_filename: String,
    pub format: AudioFormat,
    pub working_filename: String,
}

impl UploadArtifact {
    pub fn new(data: Vec<u8>, declared_filename: impl Into<String>) -> Self {
        let declared_filename = declared_filename.into();
        let format = AudioFormat::resolve(&data, &declared_filename);
        let working_filename = working_filename_for(&declared_filename, format);

        Self {
            data,
            declared_filename,
            format,
            working_filename,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension the client claimed, used as an input hint for conversion.
    pub fn declared_extension(&self) -> Option<&str> {
        extension_of(&self.declared_filename)
    }

    /// Swaps in converted bytes and renames the working file to match.
    pub fn replace_data(&mut self, data: Vec<u8>, format: AudioFormat) {
        self.data = data;
        self.format = format;
        self.working_filename = working_filename_for(&self.declared_filename, format);
    }
}

fn working_filename_for(declared: &str, format: AudioFormat) -> String {
    let stem = Path::new(declared)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM);

    let ext = match format {
        AudioFormat::Unknown => extension_of(declared).unwrap_or(format.extension()),
        known => known.extension(),
    };

    format!("{}.{}", stem, ext)
}
