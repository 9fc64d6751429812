//! Indonesian license-plate extraction from free text.

const TRIM_CHARS: &[char] = &['.', ',', '!', '?', ';', ':'];
const MIN_PLATE_LEN: usize = 5;
const MAX_PLATE_LEN: usize = 10;

/// Extracts the first plausible plate number, normalized to uppercase
/// without spaces (`"b 1234 sv"` becomes `"B1234SV"`).
///
/// A candidate is a word containing both letters and digits. When that word
/// is followed by an all-digit word and then an all-letter word, the three
/// are joined, which covers the spaced `B 1234 SV` form as long as the region
/// code carries a digit. Candidates outside 5..=10 characters are skipped.
pub fn extract_plate_number(message: &str) -> Option<String> {
    let upper = message.to_uppercase();
    let words: Vec<&str> = upper
        .split_whitespace()
        .map(|w| w.trim_matches(TRIM_CHARS))
        .collect();

    for (i, word) in words.iter().enumerate() {
        let has_letter = word.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = word.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            continue;
        }

        let mut candidate = (*word).to_string();
        if let (Some(digits), Some(letters)) = (words.get(i + 1), words.get(i + 2)) {
            if digits.chars().all(|c| c.is_ascii_digit())
                && letters.chars().all(|c| c.is_ascii_uppercase())
            {
                candidate.push_str(digits);
                candidate.push_str(letters);
            }
        }

        if (MIN_PLATE_LEN..=MAX_PLATE_LEN).contains(&candidate.len()) {
            return Some(candidate);
        }
    }

    None
}

/// Canonical lookup key for a plate: uppercase with spaces removed.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
