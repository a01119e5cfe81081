//! Diacritic-tolerant search patterns for Vietnamese text.
//! Each base letter expands to an alternation over its accented variants, so "anh" also finds "ánh".

use regex::{Regex, RegexBuilder};

/// Base letter followed by every variant it stands for (base included).
const FOLD_TABLE: &[(char, &str)] = &[
    ('a', "aàáạảãâầấậẩẫăằắặẳẵ"),
    ('d', "dđ"),
    ('e', "eèéẹẻẽêềếệểễ"),
    ('i', "iìíịỉĩ"),
    ('o', "oòóọỏõôồốộổỗơờớợởỡ"),
    ('u', "uùúụủũưừứựửữ"),
    ('y', "yỳýỵỷỹ"),
];

/// Prefix marking a query value as a folded search term.
pub const REGEX_PREFIX: &str = "$regex:";

fn variants_of(c: char) -> Option<&'static str> {
    FOLD_TABLE
        .iter()
        .find(|(_, variants)| variants.contains(c))
        .map(|(_, variants)| *variants)
}

fn push_folded(out: &mut String, c: char) {
    match variants_of(c) {
        Some(variants) => {
            out.push('(');
            for (i, v) in variants.chars().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                out.push(v);
            }
            out.push(')');
        }
        None => out.push(c),
    }
}

/// Strip punctuation, join words with `.*`, expand foldable letters.
/// Empty (or punctuation-only) input yields an empty pattern, which matches anything.
pub fn fold_pattern(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let mut out = String::with_capacity(cleaned.len() * 8);
    for (i, word) in cleaned.split_whitespace().enumerate() {
        if i > 0 {
            out.push_str(".*");
        }
        for c in word.chars().flat_map(char::to_lowercase) {
            push_folded(&mut out, c);
        }
    }
    out
}

/// Case-insensitive regex over `fold_pattern(input)`.
pub fn fold_regex(input: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&fold_pattern(input))
        .case_insensitive(true)
        .build()
}
