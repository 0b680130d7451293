//! Markup and boilerplate removal.
//!
//! Academic PDFs converted to text carry a lot of residue: reference markers, URLs,
//! affiliation blocks, copyright footers. Whole lines that look like contact or licence
//! information are dropped; inline residue is blanked out so it cannot leak into tokens.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a pattern that is known to be valid.
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("boilerplate pattern")
}

/// HTML/XML tags.
static TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"<[^>]*>"));

/// Named and numeric character entities.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| pattern(r"&(?:[a-zA-Z]+|#\d+|#x[0-9a-fA-F]+);"));

/// URLs, e-mail addresses, DOIs and arXiv identifiers.
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:https?://|www\.)\S+|[\w.+-]+@[\w-]+(?:\.[\w-]+)+|\bdoi:\s*\S+|\b10\.\d{4,9}/\S+|\barxiv:?\s*\d{4}\.\d{4,5}(?:v\d+)?",
    )
});

/// Citation markers such as `[12]`, `[3, 4]`, `[5-9]` and `et al.`.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\[\d+(?:\s*[,\x{2013}-]\s*\d+)*\]|\bet\s+al\b\.?"));

/// Copyright and licence lines.
static COPYRIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\x{00a9}|\(c\)\s*\d{4}|\bcopyright\b|\ball rights reserved\b|\blicen[cs]ed under\b|\bpermission to (?:make|reproduce)\b")
});

/// Contact lines: phone, fax and similar labels followed by digits.
static CONTACT_LINE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\b(?:tel|telephone|phone|fax|mobile)\b\.?\s*:?\s*\+?\d"));

/// Street-address vocabulary.
static ADDRESS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\b(?:street|st\.|avenue|ave\.|road|rd\.|boulevard|blvd|lane|suite|floor|building|p\.?\s?o\.?\s+box|postcode|zip)\b")
});

/// Affiliation lines beginning with an institution word.
static AFFILIATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)^\s*\d*\s*(?:department|dept\.|school|faculty|institute|university|college|laboratory)\b")
});

/// Words that make a line or phrase topical even when it mentions an institution.
static ACADEMIC_CONTEXT: &[&str] = &[
    "algorithm", "analysis", "data", "distribution", "learning", "matrix", "method", "model",
    "network", "theory", "vector",
];

/// Words that never belong in a keyword: link, citation and licence residue.
static NOISE_WORDS: &[&str] = &[
    "http", "https", "www", "com", "org", "edu", "net", "gov", "doi", "arxiv", "preprint", "vol",
    "pp", "et", "al", "email", "copyright", "licensed", "license", "reserved", "rights",
    "permission", "reproduction", "prohibited", "tel", "fax", "phone", "telephone",
];

/// Institution words that mark an affiliation when no academic word accompanies them.
static INSTITUTION_WORDS: &[&str] = &[
    "department", "faculty", "school", "institute", "college", "university", "campus",
];

/// Removes markup tags and character entities.
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG.replace_all(text, " ");
    ENTITY.replace_all(&without_tags, " ").into_owned()
}

/// Returns true if a line mentions academic vocabulary.
fn has_academic_context(text: &str) -> bool {
    let lower = text.to_lowercase();
    ACADEMIC_CONTEXT.iter().any(|w| lower.contains(w))
}

/// Returns true if an entire line is boilerplate.
fn is_boilerplate_line(line: &str) -> bool {
    if COPYRIGHT_LINE.is_match(line) || CONTACT_LINE.is_match(line) {
        return true;
    }
    if has_academic_context(line) {
        return false;
    }
    let has_digit = line.chars().any(|c| c.is_ascii_digit());
    (ADDRESS_WORD.is_match(line) && has_digit)
        || (AFFILIATION_LINE.is_match(line) && line.split_whitespace().count() <= 12)
}

/// Drops boilerplate lines and blanks out links and citation markers.
pub fn strip_boilerplate(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !is_boilerplate_line(line))
        .collect();
    let joined = kept.join("\n");
    let without_links = LINK.replace_all(&joined, " ");
    CITATION.replace_all(&without_links, " ").into_owned()
}

/// Returns true if a normalized candidate term looks like residue rather than a topic.
///
/// Flags repeated words, link/citation/licence words, runs of four or more digits,
/// more than five words, and institution names without academic vocabulary.
pub fn is_noise_term(term: &str) -> bool {
    let words: Vec<&str> = term.split_whitespace().collect();
    if words.is_empty() || words.len() > 5 {
        return true;
    }
    for (i, word) in words.iter().enumerate() {
        if words[..i].contains(word) {
            return true;
        }
    }
    if words.iter().any(|w| NOISE_WORDS.contains(w)) {
        return true;
    }
    let mut digit_run = 0;
    for c in term.chars() {
        digit_run = if c.is_ascii_digit() { digit_run + 1 } else { 0 };
        if digit_run >= 4 {
            return true;
        }
    }
    words.iter().any(|w| INSTITUTION_WORDS.contains(w)) && !has_academic_context(term)
}
