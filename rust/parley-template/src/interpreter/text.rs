//! Plain string transforms behind the text tags.

use crate::NIL;

/// Spaces out every character, dropping the original whitespace.
pub(crate) fn explode(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases the text and capitalizes the first letter of each word.
pub(crate) fn formal(text: &str) -> String {
    let mut capitalize = true;
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            capitalize = true;
            output.push(c);
        } else if capitalize && c.is_alphabetic() {
            capitalize = false;
            output.extend(c.to_uppercase());
        } else {
            output.extend(c.to_lowercase());
        }
    }
    output
}

/// Capitalizes the first character and leaves the rest alone.
pub(crate) fn sentence(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn first_word(text: &str) -> String {
    text.split_whitespace().next().unwrap_or(NIL).to_owned()
}

/// Everything after the first word, or `NIL` when there is nothing after it.
pub(crate) fn rest_words(text: &str) -> String {
    match text.trim().split_once(char::is_whitespace) {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim().to_owned(),
        _ => NIL.to_owned(),
    }
}
