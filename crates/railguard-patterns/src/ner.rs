//! Named-entity recognition seam for bare-name PII detection.
//!
//! A real recognizer (a Thai NER model) is an external collaborator; this
//! crate only defines the seam and the BIO-span merging every recognizer
//! adapter needs. When no recognizer is installed, [`crate::PiiDetector`]
//! falls back to its honorific-prefix heuristic.

/// Tags person names in running text.
pub trait NameRecognizer: Send + Sync {
    /// Full person-name spans found in `text`, in order of appearance.
    fn person_names(&self, text: &str) -> Vec<String>;
}

/// Merge BIO-tagged tokens into full person-name spans.
///
/// Recognizers commonly emit `(token, tag)` pairs where a name is a begin
/// token followed by inside tokens (`B-PERSON`, `I-PERSON`). Adjacent tokens
/// whose tag contains `PERSON` are concatenated into one span; any other tag
/// closes the current span.
pub fn merge_bio_spans(tokens: &[(String, String)]) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();

    for (word, tag) in tokens {
        if tag.contains("PERSON") {
            current.push_str(word);
        } else if !current.trim().is_empty() {
            names.push(current.trim().to_string());
            current.clear();
        } else {
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        names.push(current.trim().to_string());
    }

    names
}
