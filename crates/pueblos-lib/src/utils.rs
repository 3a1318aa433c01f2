//! Utility functions for locale-aware ordering of facet values
//!
//! Facet pickers list values the way a Spanish-speaking reader expects:
//! accents and case do not affect the order ("Ángel" sorts with "angel"),
//! and "ñ" sorts after "n".

use std::cmp::Ordering;

/// Map a character to its collation base letter(s)
#[inline]
fn fold_char(c: char, out: &mut String) {
    let base = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        // Spanish alphabet: ñ is its own letter between n and o
        'ñ' | 'Ñ' => {
            out.push('n');
            out.push('\u{10FFFF}');
            return;
        }
        other => {
            out.extend(other.to_lowercase());
            return;
        }
    };
    out.push(base);
}

/// Primary collation key: case- and accent-insensitive
pub fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.chars() {
        fold_char(c, &mut key);
    }
    key
}

/// Compare two facet values in display order
///
/// Ties on the folded key are broken by the raw strings so the order is total
/// and deterministic.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Collect values into a de-duplicated, collated list
pub fn sorted_collated<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut keyed: Vec<(String, String)> = values
        .into_iter()
        .map(Into::into)
        .filter(|value: &String| !value.is_empty())
        .map(|value| (collation_key(&value), value))
        .collect();
    keyed.sort_unstable();
    keyed.dedup_by(|a, b| a.1 == b.1);
    keyed.into_iter().map(|(_, value)| value).collect()
}
