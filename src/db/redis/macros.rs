/// Read-through caching for fallible async lookups.
///
/// Returns the value stored under `$key` when present. Otherwise awaits
/// `$block`, queues the result for storage with `$ttl` seconds to live and
/// returns it. The cache is an optimization only: a failed read is logged and
/// treated as a miss, a failed write is logged and ignored. Errors from
/// `$block` itself propagate with `?`.
///
/// # Example
/// ```rust,ignore
/// let books: Vec<Book> = cached!(self.cache, key, SEARCH_TTL, async move {
///     fetch_from_api().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                if let Err(e) = $cache.set_in_background(&key, &value, Some($ttl)) {
                    tracing::warn!(error = %e, key = %key, "Cache write skipped");
                }
                Ok(value)
            }
        }
    }};
}
