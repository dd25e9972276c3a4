//! Tag colour palette and random colour assignment for lazily created tags.

use ring::rand::{SecureRandom, SystemRandom};

/// Every colour a tag may carry, in display order.
pub const TAG_COLORS: [&str; 10] = [
    "blue", "purple", "green", "orange", "red", "indigo", "pink", "cyan", "amber", "slate",
];

/// The neutral colour, never handed out at random.
pub const NEUTRAL_COLOR: &str = "slate";

/// Colours eligible for random assignment.
pub fn assignable_colors() -> impl Iterator<Item = &'static str> {
    TAG_COLORS.iter().copied().filter(|c| *c != NEUTRAL_COLOR)
}

pub fn is_known_color(color: &str) -> bool {
    TAG_COLORS.contains(&color)
}

/// Maps a random byte onto `0..len`, or `None` when the byte falls in the
/// tail that would favour the lowest indices.
fn unbiased_index(byte: u8, len: usize) -> Option<usize> {
    let byte = usize::from(byte);
    let accepted = 256 - 256 % len;
    (byte < accepted).then(|| byte % len)
}

/// Picks tag colours using the system CSPRNG.
pub struct TagPalette {
    rng: SystemRandom,
}

impl TagPalette {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Returns a uniformly random non-neutral colour.
    pub fn random_color(&self) -> &'static str {
        let choices: Vec<&'static str> = assignable_colors().collect();
        let mut byte = [0u8; 1];
        loop {
            // A failed draw still yields a valid colour.
            if self.rng.fill(&mut byte).is_err() {
                return choices[0];
            }
            if let Some(index) = unbiased_index(byte[0], choices.len()) {
                return choices[index];
            }
        }
    }
}

impl Default for TagPalette {
    fn default() -> Self {
        Self::new()
    }
}
