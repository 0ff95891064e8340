//! Suggestion engine
//!
//! Turns a target profile and a snapshot of the full profile collection
//! into the list of candidates worth suggesting.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::score::confidence;

/// Scores strictly above this qualify a candidate as a suggestion.
pub const SUGGESTION_THRESHOLD: u32 = 1;

/// Compute suggestions for `target_id` from a profile snapshot.
///
/// Every profile other than the target is scored against it with
/// [`confidence`], and candidates scoring above
/// [`SUGGESTION_THRESHOLD`] are returned. Candidates are visited in
/// ascending id order, so the result list is ordered the same way. An
/// empty result is a normal outcome; the caller decides how to report
/// it.
///
/// Fails with [`Error::ProfileNotFound`] if `target_id` is not in the
/// snapshot. The HTTP boundary checks existence before calling this,
/// but the engine does not rely on that.
pub fn suggestions_for(
    target_id: &str,
    profiles: &BTreeMap<String, Profile>,
) -> Result<Vec<Profile>> {
    let target = profiles
        .get(target_id)
        .ok_or_else(|| Error::ProfileNotFound(target_id.to_string()))?;

    let mut suggestions = Vec::new();
    for (id, candidate) in profiles {
        if id == target_id {
            continue;
        }
        if confidence(target, candidate)? > SUGGESTION_THRESHOLD {
            suggestions.push(candidate.clone());
        }
    }
    Ok(suggestions)
}
