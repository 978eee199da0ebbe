//! JSON 文件存储实现

mod profile_store;

pub use profile_store::JsonProfileStore;
