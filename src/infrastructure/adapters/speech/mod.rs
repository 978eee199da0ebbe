//! Speech Adapters - 语音合成服务适配器

mod elevenlabs_client;
mod fake_speech_client;

pub use elevenlabs_client::{ElevenLabsClient, ElevenLabsClientConfig};
pub use fake_speech_client::FakeSpeechClient;
