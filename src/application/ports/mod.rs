//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod device_control;
mod profile_store;
mod speech_engine;

pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use device_control::{CommandOutcome, DeviceControlPort, DeviceError, DeviceStatus};
pub use profile_store::{ProfileStorePort, StoreError};
pub use speech_engine::{
    ModelInfo, SpeechEnginePort, SpeechError, SynthesisRequest, SynthesizedAudio, VoiceInfo,
};
