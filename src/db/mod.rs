pub mod profiles;
pub mod redis;

pub use profiles::{InMemoryProfileStore, ProfileStore, RedisProfileStore};
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use self::redis::CacheWriterHandle;

#[cfg(test)]
pub use profiles::MockProfileStore;
