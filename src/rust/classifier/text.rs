use super::stopwords::is_stop_word;

/// Normalizes text for topic and urgency features.
///
/// The steps run in a fixed order, each on the output of the previous one:
/// 1. lowercase
/// 2. strip ASCII punctuation
/// 3. strip numeric characters
/// 4. drop English and German stop words (whitespace tokenization)
///
/// Punctuation is stripped before stop words are matched, so contractions
/// such as "don't" become "dont" and survive.
pub fn normalize_semantic(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_punctuation: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let without_digits: String = without_punctuation
        .chars()
        .filter(|c| !c.is_numeric())
        .collect();

    without_digits
        .split_whitespace()
        .filter(|token| !is_stop_word(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes text for language identification: lowercase only.
///
/// Punctuation, digits and stop words stay in place; they are part of the
/// character signature of a language.
pub fn normalize_language(text: &str) -> String {
    text.to_lowercase()
}
