//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechEngine、DeviceControl、ProfileStore、AudioStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - dispatch: 工具名到处理器的路由
//! - error: 应用层错误定义

pub mod commands;
pub mod dispatch;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    DeleteProfile, ExecuteDeviceCommand, GenerateSpeech, GenerateSpeechFromProfile, SaveProfile,
    // Handlers
    handlers::{
        DeleteProfileHandler, DeviceCommandResponse, ExecuteDeviceCommandHandler,
        GenerateSpeechFromProfileHandler, GenerateSpeechHandler, GeneratedSpeech,
        SaveProfileHandler, SpeechOptions,
    },
};

pub use dispatch::{tool_catalog, ToolDispatcher, ToolName, ToolPayload, ToolRequest, ToolResult};

pub use error::{ApplicationError, ErrorKind};

pub use ports::{
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    // Device control
    CommandOutcome,
    DeviceControlPort,
    DeviceError,
    DeviceStatus,
    // Profile store
    ProfileStorePort,
    StoreError,
    // Speech engine
    ModelInfo,
    SpeechEnginePort,
    SpeechError,
    SynthesisRequest,
    SynthesizedAudio,
    VoiceInfo,
};

pub use queries::{
    GetDeviceStatus, GetProfile, GetVoiceDetails, ListModels, ListProfiles, ListVoices,
    // Handlers
    handlers::{
        DeviceStatusResponse, GetDeviceStatusHandler, GetProfileHandler, GetVoiceDetailsHandler,
        ListModelsHandler, ListProfilesHandler, ListVoicesHandler,
    },
};
