//! Stop-word language guesser.
//!
//! Each candidate scores one point per text word that appears in its
//! stop-word list. A zero top score or a tie for first place yields `und`.

use mpdf_schema::LanguageCode;

/// Candidate languages in ranking order; earlier entries win nothing on ties.
pub const STOP_WORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &["the", "is", "and", "of", "to", "in", "that", "it", "for", "was", "with", "this", "are"],
    ),
    (
        "es",
        &["de", "la", "el", "en", "que", "los", "del", "las", "por", "con", "una", "para", "como"],
    ),
    (
        "fr",
        &["de", "la", "le", "et", "les", "des", "en", "est", "que", "une", "dans", "pour", "qui"],
    ),
    (
        "de",
        &["der", "die", "und", "den", "das", "ist", "von", "ein", "mit", "auf", "sich", "dem", "nicht"],
    ),
    (
        "pt",
        &["de", "que", "do", "da", "em", "para", "com", "uma", "os", "das", "no", "mais", "por"],
    ),
];

/// Per-language scores, in [`STOP_WORDS`] order.
pub fn score_languages(text: &str) -> Vec<(&'static str, usize)> {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    STOP_WORDS
        .iter()
        .map(|(lang, stops)| {
            let score = words.iter().filter(|w| stops.contains(&w.as_str())).count();
            (*lang, score)
        })
        .collect()
}

pub fn detect_language(text: &str) -> LanguageCode {
    let mut scores = score_languages(text);
    scores.sort_by(|a, b| b.1.cmp(&a.1));
    match scores.as_slice() {
        [(lang, top), rest @ ..] if *top > 0 && rest.first().map_or(true, |(_, s)| s < top) => {
            LanguageCode::new(*lang)
        }
        _ => LanguageCode::undetermined(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english() {
        let text = "The quick brown fox jumps over the lazy dog. This is a test of the language detection system and it works well for English text.";
        assert_eq!(detect_language(text), "en");
    }

    #[test]
    fn detects_spanish() {
        let text = "El rápido zorro marrón salta sobre el perro perezoso. Esta es una prueba del sistema de detección de idioma para los textos en español.";
        assert_eq!(detect_language(text), "es");
    }

    #[test]
    fn detects_french() {
        let text = "Le renard brun rapide saute par-dessus le chien paresseux. Les tests sont dans une phase de développement et il est important pour qui veut.";
        assert_eq!(detect_language(text), "fr");
    }

    #[test]
    fn detects_german() {
        let text = "Der schnelle braune Fuchs springt über den faulen Hund. Das ist ein Test für die Spracherkennung und es funktioniert nicht schlecht mit dem System.";
        assert_eq!(detect_language(text), "de");
    }

    #[test]
    fn numeric_text_is_undetermined() {
        assert_eq!(detect_language("123 456 789"), "und");
    }

    #[test]
    fn empty_text_is_undetermined() {
        assert_eq!(detect_language(""), "und");
        assert_eq!(detect_language("   \n\t "), "und");
    }

    #[test]
    fn tie_is_undetermined() {
        // "de" scores for es, fr and pt alike.
        assert_eq!(detect_language("de"), "und");
        // one English and one German stop word
        assert_eq!(detect_language("the und"), "und");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(detect_language("THE cat AND the dog"), "en");
    }

    #[test]
    fn punctuation_attached_words_do_not_match() {
        assert_eq!(score_languages("the, the.")[0], ("en", 0));
    }

    #[test]
    fn duplicates_count_every_time() {
        assert_eq!(score_languages("the the the")[0], ("en", 3));
    }
}
