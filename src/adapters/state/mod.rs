//! Watermark store implementations

pub mod factory;
pub mod memory;
pub mod redis;

pub use factory::create_watermark_store;
pub use memory::MemoryWatermarkStore;
pub use self::redis::RedisWatermarkStore;
