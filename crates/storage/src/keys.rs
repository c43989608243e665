//! Record keys. Kept identical to the browser build so exported stores line up.

/// Key of the capsule index record.
pub const INDEX_KEY: &str = "pc_capsules_index";

const CAPSULE_PREFIX: &str = "pc_capsule_";
const PROGRESS_PREFIX: &str = "pc_progress_";

#[must_use]
pub fn capsule_key(id: &str) -> String {
    format!("{CAPSULE_PREFIX}{id}")
}

#[must_use]
pub fn progress_key(id: &str) -> String {
    format!("{PROGRESS_PREFIX}{id}")
}

/// Capsule id encoded in a capsule record key, if `key` is one.
#[must_use]
pub fn capsule_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(CAPSULE_PREFIX)
}

/// Capsule id encoded in a progress record key, if `key` is one.
#[must_use]
pub fn progress_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(PROGRESS_PREFIX)
}
