//! Shared constants for pocket-classroom.
//!
//! Centralizes values that the storage, service and CLI layers all agree on.

use std::time::Duration;

/// Format tag written into every capsule; import rejects anything else.
pub const SCHEMA_TAG: &str = "pocket-classroom/v1";

/// Level assigned when the author leaves it blank or an import omits it.
pub const DEFAULT_LEVEL: &str = "Beginner";

/// Number of answer slots (`A`-`D`) the authoring form offers per question.
pub const CHOICES_PER_QUESTION: usize = 4;

/// How long per-question feedback stays on screen before the quiz moves on.
pub const FEEDBACK_DELAY: Duration = Duration::from_secs(2);

/// Upper bound of a quiz score percentage.
pub const MAX_SCORE: u8 = 100;
