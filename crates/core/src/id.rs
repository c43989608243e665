//! Capsule identifier generation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use uuid::Uuid;

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Length of the random suffix appended after the timestamp.
const SUFFIX_LEN: usize = 9;

/// Generates a capsule id of the form `cap_<millis>_<suffix>`.
///
/// The millisecond component never goes backwards within a process, even if
/// the wall clock does. Uniqueness rests on the random suffix and is
/// probabilistic.
#[must_use]
pub fn generate_id() -> String {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_MILLIS.fetch_max(now, Ordering::Relaxed);
    let millis = previous.max(now);
    let suffix = Uuid::new_v4().simple().to_string();
    format!("cap_{millis}_{}", &suffix[..SUFFIX_LEN])
}
