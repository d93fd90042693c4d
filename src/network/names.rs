//! Dotted station name helpers

use std::cmp::Ordering;

/// Separator between survey levels in station names.
pub const SEPARATOR: char = '.';

/// Survey part of a dotted name (everything before the last separator).
pub fn survey_of(name: &str) -> &str {
    match name.rfind(SEPARATOR) {
        Some(idx) => &name[..idx],
        None => "",
    }
}

/// Last component of a dotted name.
pub fn leaf_of(name: &str) -> &str {
    match name.rfind(SEPARATOR) {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Therion notation: `a.b.c` becomes `c@b.a`, undotted names are unchanged.
pub fn therion_name(name: &str) -> String {
    let mut parts: Vec<&str> = name.split(SEPARATOR).collect();
    if parts.len() == 1 {
        return name.to_string();
    }
    let station = parts.pop().unwrap_or_default();
    parts.reverse();
    format!("{}@{}", station, parts.join("."))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u64),
    Text(String),
}

fn natural_chunks(s: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut digits = false;
    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != digits {
            chunks.push(make_chunk(&current, digits));
            current.clear();
        }
        digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(make_chunk(&current, digits));
    }
    chunks
}

fn make_chunk(s: &str, digits: bool) -> Chunk {
    if digits {
        if let Ok(n) = s.parse() {
            return Chunk::Number(n);
        }
    }
    Chunk::Text(s.to_lowercase())
}

/// "Natural" ordering: digit runs compare numerically, text case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_chunks(a)
        .cmp(&natural_chunks(b))
        .then_with(|| a.cmp(b))
}
