//! Finding a literal on its line when the line may have drifted.
//!
//! The stored column is tried first. Failing that, offsets 1..=DRIFT_RADIUS
//! are tried outward, left before right at each distance, and the first exact
//! match wins. Anything further away is reported as a mismatch rather than
//! guessed at.

use crate::read::char_window;

/// Maximum drift, in characters, tolerated either side of the stored column.
pub const DRIFT_RADIUS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// 1-indexed column where `expected` starts, and how far it moved.
    Found { column: usize, drift: isize },
    /// What sits at the stored column instead.
    Mismatch { found: String },
}

/// Search `line` for `expected` around the 1-indexed `column`.
pub fn locate_literal(line: &str, column: usize, expected: &str) -> Located {
    let chars: Vec<char> = line.chars().collect();
    let needle: Vec<char> = expected.chars().collect();
    let start = column.saturating_sub(1);

    let matches_at = |pos: usize| {
        chars
            .get(pos..pos + needle.len())
            .is_some_and(|window| window == needle.as_slice())
    };

    for (pos, drift) in candidate_offsets(start) {
        if matches_at(pos) {
            return Located::Found {
                column: pos + 1,
                drift,
            };
        }
    }

    Located::Mismatch {
        found: char_window(line, start, needle.len()).to_string(),
    }
}

/// Positions to try, in order: `start`, then `start-1`, `start+1`, ...
fn candidate_offsets(start: usize) -> impl Iterator<Item = (usize, isize)> {
    let outward = (1..=DRIFT_RADIUS).flat_map(move |offset| {
        let left = start.checked_sub(offset).map(|pos| (pos, -(offset as isize)));
        let right = Some((start + offset, offset as isize));
        left.into_iter().chain(right)
    });
    std::iter::once((start, 0)).chain(outward)
}
