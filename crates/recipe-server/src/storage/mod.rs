//! Storage layer
//!
//! Recipe stores: SQLite (embedded) or in-memory.
//! Cache backends: Redis, or DashMap (in-memory) when no Redis is around.

pub mod db;
pub mod memory;
pub mod memory_store;
pub mod redis_cache;

pub use db::Database;
pub use memory::MemoryCache;
pub use memory_store::MemoryRecipeStore;
pub use redis_cache::RedisCache;
