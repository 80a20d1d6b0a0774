//! Label normalization: turns a human-readable label into an identifier-like
//! string.
//!
//! Three total steps run in order:
//!
//! 1. characters of the transliteration table are replaced by ASCII
//! 2. every run of whitespace and/or the separator becomes a single `_`
//! 3. `(`, `)` and `-` are removed
//!
//! The composition is idempotent. [`validate_label`] then rejects anything
//! the table does not cover.

use pumf_model::NormalizationOptions;

/// Accented and typographic characters with their ASCII replacements.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('À', "A"),
    ('Á', "A"),
    ('Â', "A"),
    ('Ã', "A"),
    ('Ä', "A"),
    ('Å', "A"),
    ('Æ', "AE"),
    ('Ç', "C"),
    ('È', "E"),
    ('É', "E"),
    ('Ê', "E"),
    ('Ë', "E"),
    ('Ì', "I"),
    ('Í', "I"),
    ('Î', "I"),
    ('Ï', "I"),
    ('Ñ', "N"),
    ('Ò', "O"),
    ('Ó', "O"),
    ('Ô', "O"),
    ('Õ', "O"),
    ('Ö', "O"),
    ('Ø', "O"),
    ('Ù', "U"),
    ('Ú', "U"),
    ('Û', "U"),
    ('Ü', "U"),
    ('Ý', "Y"),
    ('Œ', "OE"),
    ('Ÿ', "Y"),
    ('ß', "ss"),
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('ã', "a"),
    ('ä', "a"),
    ('å', "a"),
    ('æ', "ae"),
    ('ç', "c"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('ì', "i"),
    ('í', "i"),
    ('î', "i"),
    ('ï', "i"),
    ('ñ', "n"),
    ('ò', "o"),
    ('ó', "o"),
    ('ô', "o"),
    ('õ', "o"),
    ('ö', "o"),
    ('ø', "o"),
    ('ù', "u"),
    ('ú', "u"),
    ('û', "u"),
    ('ü', "u"),
    ('ý', "y"),
    ('ÿ', "y"),
    ('œ', "oe"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
];

/// Characters removed in the last normalization step.
const STRIPPED: [char; 3] = ['(', ')', '-'];

/// Normalization rules for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationRules {
    separator: char,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self::from_options(&NormalizationOptions::default())
    }
}

impl NormalizationRules {
    /// Rules for validated options; see `RecodeOptions::validate`.
    pub fn from_options(options: &NormalizationOptions) -> Self {
        Self {
            separator: options.separator,
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Runs the full normalization pipeline.
    pub fn normalize(&self, label: &str) -> String {
        let ascii = transliterate(label);
        let collapsed = collapse_separators(&ascii, self.separator);
        strip_punctuation(&collapsed)
    }
}

/// Normalizes `label` with the given rules.
pub fn normalize_label(label: &str, rules: &NormalizationRules) -> String {
    rules.normalize(label)
}

/// Returns the distinct characters a normalized label may not contain, in
/// order of first appearance. An empty result means the label is valid.
pub fn validate_label(normalized: &str) -> Vec<char> {
    let mut offending = Vec::new();
    for ch in normalized.chars() {
        let forbidden = !ch.is_ascii() || ch.is_whitespace() || STRIPPED.contains(&ch);
        if forbidden && !offending.contains(&ch) {
            offending.push(ch);
        }
    }
    offending
}

fn transliterate(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for ch in label.chars() {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None => out.push(ch),
        }
    }
    out
}

fn collapse_separators(label: &str, separator: char) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_run = false;
    for ch in label.chars() {
        if ch.is_whitespace() || ch == separator {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

fn strip_punctuation(label: &str) -> String {
    label.chars().filter(|ch| !STRIPPED.contains(ch)).collect()
}
