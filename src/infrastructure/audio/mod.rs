mod ffmpeg_transcoder;
mod openai_whisper_engine;

pub use ffmpeg_transcoder::{FfmpegTranscoder, check_ffmpeg_binary};
pub use openai_whisper_engine::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiWhisperEngine};
