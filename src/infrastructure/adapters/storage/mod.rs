//! Storage Adapter - 音频文件存储

mod file_storage;

pub use file_storage::FileAudioStorage;
