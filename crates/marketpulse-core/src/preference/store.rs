//! PreferenceStore trait.

use crate::error::Result;

/// Durable string key-value store scoped to the local profile.
///
/// The store performs no validation; callers serialize structured values
/// before `set` and parse them after `get`. There are no transactions across
/// keys, so callers that write several related keys must order their writes.
///
/// Operations are synchronous: stores are local and the controllers that
/// use them must persist and notify before returning to the caller.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Creates or overwrites an entry.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes an entry. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
