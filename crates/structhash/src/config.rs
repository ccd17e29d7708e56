//! Loading a hashing [`Policy`] from JSON.
//!
//! Missing keys take their defaults, so `{}` is the default policy:
//!
//! ```json
//! {
//!   "hasher": "fnv64",
//!   "tag_name": "hash",
//!   "zero_nil": false,
//!   "ignore_zero_value": false,
//!   "slices_as_sets": false,
//!   "use_stringer": false
//! }
//! ```

use std::path::Path;

use structhash_core::Policy;
use tracing::debug;

use crate::error::{Error, Result};

/// Parse a policy from a JSON document.
pub fn policy_from_json(text: &str) -> Result<Policy> {
    let policy: Policy = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
    debug!(?policy, "loaded hashing policy");
    Ok(policy)
}

/// Read and parse a policy file.
pub fn policy_from_file(path: impl AsRef<Path>) -> Result<Policy> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    policy_from_json(&text)
}

/// Render a policy as pretty JSON.
pub fn policy_to_json(policy: &Policy) -> Result<String> {
    serde_json::to_string_pretty(policy).map_err(|e| Error::Config(e.to_string()))
}
