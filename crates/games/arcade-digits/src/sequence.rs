use rand::Rng;

use crate::config::DigitsConfig;

/// Characters from `charset` in first-seen order, without duplicates or whitespace.
pub fn parse_charset(charset: &str) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();
    for c in charset.chars().filter(|c| !c.is_whitespace()) {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// A sequence of `len` characters drawn uniformly from `charset`.
pub fn generate(rng: &mut impl Rng, charset: &[char], len: usize) -> Vec<char> {
    if charset.is_empty() {
        return Vec::new();
    }
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect()
}

/// Length of the sequence that follows one of `current` characters.
pub fn next_length(config: &DigitsConfig, current: usize) -> usize {
    (current + config.length_step).min(config.max_length.max(1))
}

pub fn first_length(config: &DigitsConfig) -> usize {
    config.start_length.clamp(1, config.max_length.max(1))
}

pub fn preview_duration_ms(config: &DigitsConfig, len: usize) -> f32 {
    config.preview_base_ms + config.preview_per_char_ms * len as f32
}
