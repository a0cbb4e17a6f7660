use std::fmt;
use std::path::Path;

const ID3_MAGIC: &[u8] = b"ID3";
const OGG_MAGIC: &[u8] = b"OggS";
const FTYP_MAGIC: &[u8] = b"ftyp";
const FTYP_OFFSET: usize = 4;

/// Container type of an uploaded clip, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Ogg,
    Unknown,
}

impl AudioFormat {
    /// Classifies a buffer by its leading byte signature only.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(ID3_MAGIC) || is_mpeg_frame_sync(data) {
            return AudioFormat::Mp3;
        }

        if data.len() >= FTYP_OFFSET + FTYP_MAGIC.len()
            && &data[FTYP_OFFSET..FTYP_OFFSET + FTYP_MAGIC.len()] == FTYP_MAGIC
        {
            return AudioFormat::M4a;
        }

        if data.starts_with(OGG_MAGIC) {
            return AudioFormat::Ogg;
        }

        AudioFormat::Unknown
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "m4a" | "mp4" => AudioFormat::M4a,
            "ogg" | "oga" | "opus" => AudioFormat::Ogg,
            _ => AudioFormat::Unknown,
        }
    }

    /// Sniffs the bytes and only consults the declared filename when the
    /// signature is inconclusive.
    pub fn resolve(data: &[u8], declared_filename: &str) -> Self {
        match Self::sniff(data) {
            AudioFormat::Unknown => extension_of(declared_filename)
                .map(Self::from_extension)
                .unwrap_or(AudioFormat::Unknown),
            sniffed => sniffed,
        }
    }

    /// Formats the provider accepts without normalization.
    pub fn is_provider_acceptable(&self) -> bool {
        matches!(self, AudioFormat::Mp3 | AudioFormat::M4a)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Unknown => "bin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// MIME type for a multipart file part, keyed on the filename extension.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = extension_of(filename).map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("ogg") | Some("oga") | Some("opus") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

pub(crate) fn extension_of(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
}

// 11 sync bits, then a version and a layer that are not reserved.
// Layer `00` also rules out ADTS AAC, which shares the sync word.
fn is_mpeg_frame_sync(data: &[u8]) -> bool {
    data.len() >= 2
        && data[0] == 0xFF
        && (data[1] & 0xE0) == 0xE0
        && (data[1] & 0x18) != 0x08
        && (data[1] & 0x06) != 0
}
