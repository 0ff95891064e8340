//! Compatibility scoring
//!
//! Computes the integer confidence score for a pair of profiles. The
//! score is the only signal the suggestion engine ranks on: one point
//! per matching favourite field, plus one point per shared bio word.

use ahash::AHashSet;

use crate::error::Result;
use crate::profile::Profile;

/// Profiles whose name starts with this prefix are test data; their
/// bios are excluded from word-overlap scoring.
pub const TEST_NAME_PREFIX: &str = "Test";

/// Compute the confidence score between two profiles.
///
/// - +1 if both profiles carry the same non-empty `favouriteColour`
///   (case-sensitive exact match);
/// - +1 likewise for `favouriteFood`;
/// - +1 for every word of `a`'s bio that occurs anywhere in `b`'s bio,
///   comparing lower-cased and splitting on single spaces. Skipped
///   entirely when either profile's name starts with
///   [`TEST_NAME_PREFIX`].
///
/// The bio contribution is order-dependent on purpose: `a`'s word
/// sequence is walked with duplicates intact while `b`'s words only
/// form a membership set, so `confidence(a, b)` and `confidence(b, a)`
/// can differ. Callers that need a relation must pick an orientation.
///
/// Both profiles must carry `name` and `bio`; a missing one fails with
/// [`Error::MissingField`](crate::error::Error::MissingField) rather
/// than scoring 0, so store corruption surfaces instead of hiding.
pub fn confidence(a: &Profile, b: &Profile) -> Result<u32> {
    let a_name = a.name()?;
    let b_name = b.name()?;
    let a_bio = a.bio()?;
    let b_bio = b.bio()?;

    let mut score = 0u32;

    if let (Some(ours), Some(theirs)) = (a.favourite_colour(), b.favourite_colour()) {
        if !ours.is_empty() && ours == theirs {
            score += 1;
        }
    }

    if let (Some(ours), Some(theirs)) = (a.favourite_food(), b.favourite_food()) {
        if !ours.is_empty() && ours == theirs {
            score += 1;
        }
    }

    if !a_name.starts_with(TEST_NAME_PREFIX) && !b_name.starts_with(TEST_NAME_PREFIX) {
        let theirs: AHashSet<String> = bio_words(b_bio).collect();
        for word in bio_words(a_bio) {
            if theirs.contains(&word) {
                score += 1;
            }
        }
    }

    Ok(score)
}

/// Lower-case a bio and split it into words on single spaces.
///
/// An empty bio yields no words. Whitespace is not trimmed or
/// collapsed first, so runs of spaces produce empty-string words; two
/// bios that both contain doubled spaces will match on them.
fn bio_words(bio: &str) -> impl Iterator<Item = String> {
    let lowered = bio.to_lowercase();
    let words: Vec<String> = if lowered.is_empty() {
        Vec::new()
    } else {
        lowered.split(' ').map(str::to_string).collect()
    };
    words.into_iter()
}
