//! Identifier case conversion.
//!
//! Type names are written in `UpperCamelCase` and property names in
//! `snake_case`; documents often want something else.
//!
//! ```
//! use rp_utils::case;
//!
//! assert_eq!(case::snake_case("HardcoreBand"), "hardcore_band");
//! assert_eq!(case::lower_camel_case("song_name"), "songName");
//! ```

use alloc::string::String;

/// Returns the last segment of a `::` separated path.
///
/// ```
/// assert_eq!(rp_utils::case::last_segment("::music::HardcoreBand"), "HardcoreBand");
/// assert_eq!(rp_utils::case::last_segment("Band"), "Band");
/// ```
#[inline]
pub fn last_segment(path: &str) -> &str {
    match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

/// Converts `UpperCamelCase` (or `lowerCamelCase`) to `snake_case`.
///
/// Runs of capitals are treated as one word, so `HTTPClient` becomes
/// `http_client`. Existing underscores are kept.
pub fn snake_case(ident: &str) -> String {
    let chars: alloc::vec::Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            if index > 0 && !out.ends_with('_') {
                let prev = chars[index - 1];
                let next_is_lower = chars.get(index + 1).is_some_and(|c| c.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }

    out
}

/// Converts `snake_case` to `lowerCamelCase`.
pub fn lower_camel_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut upper_next = false;

    for ch in ident.chars() {
        if ch == '_' {
            // Leading underscores are dropped.
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}
