//! Device Adapter - MIA IoT 服务客户端

mod http_device_client;

pub use http_device_client::{HttpDeviceClient, HttpDeviceClientConfig};
