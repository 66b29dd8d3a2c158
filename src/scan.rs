//! Text scanners backing the rule checks.
//!
//! Every scanner is pure and total: any string, including the empty string
//! or one made only of control glyphs, produces a well-defined result.

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::lookup;

fn special_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9\s]").expect("literal pattern compiles"))
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[+-]?\d+(?:\.\d+)?").expect("literal pattern compiles"))
}

/// Sum of all decimal digit characters.
#[must_use]
pub fn digit_sum(text: &str) -> u32 {
    text.chars().filter_map(|c| c.to_digit(10)).sum()
}

/// True if the text contains a character outside `[A-Za-z0-9\s]`.
#[must_use]
pub fn contains_special(text: &str) -> bool {
    special_re().is_match(text)
}

/// Signed decimal tokens, in order of appearance.
///
/// Tokens that overflow `f64` parsing are skipped rather than failing the
/// whole scan.
#[must_use]
pub fn decimal_tokens(text: &str) -> Vec<f64> {
    decimal_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Maximal runs of Roman numeral characters after uppercasing.
#[must_use]
pub fn roman_tokens(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in upper.chars() {
        if matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M') {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Value of a Roman numeral token using subtractive notation.
#[must_use]
pub fn roman_value(token: &str) -> u32 {
    fn digit(c: char) -> u32 {
        match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => 0,
        }
    }

    let chars: Vec<char> = token.chars().collect();
    let mut total = 0;
    for (i, &c) in chars.iter().enumerate() {
        let value = digit(c);
        let next = chars.get(i + 1).map_or(0, |&n| digit(n));
        if value < next {
            total -= i64::from(value);
        } else {
            total += i64::from(value);
        }
    }
    u32::try_from(total.max(0)).unwrap_or(0)
}

/// True if some two-character window, title-cased, is a two-letter element
/// symbol.
#[must_use]
pub fn element_window_present(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).any(|pair| {
        let mut symbol = String::with_capacity(8);
        symbol.extend(pair[0].to_uppercase());
        symbol.extend(pair[1].to_lowercase());
        lookup::is_two_letter_symbol(&symbol)
    })
}

/// Atomic-number summation over matched one- and two-letter symbol windows.
///
/// Two-letter windows may overlap each other; a single letter inside a
/// matched two-letter window is not counted again on its own.
#[must_use]
pub fn atomic_sum(text: &str) -> u32 {
    let chars: Vec<char> = text.chars().collect();
    let mut covered = vec![false; chars.len()];
    let mut sum = 0;

    for i in 0..chars.len().saturating_sub(1) {
        let mut symbol = String::with_capacity(8);
        symbol.extend(chars[i].to_uppercase());
        symbol.extend(chars[i + 1].to_lowercase());
        if let Some(n) = lookup::atomic_number(&symbol) {
            sum += n;
            covered[i] = true;
            covered[i + 1] = true;
        }
    }

    for (i, &c) in chars.iter().enumerate() {
        if covered[i] {
            continue;
        }
        let symbol: String = c.to_uppercase().collect();
        if let Some(n) = lookup::atomic_number(&symbol) {
            sum += n;
        }
    }

    sum
}

/// Number of vowel characters.
#[must_use]
pub fn vowel_count(text: &str) -> usize {
    text.chars().filter(|&c| lookup::is_vowel(c)).count()
}

/// True if three identical grapheme clusters appear consecutively.
#[must_use]
pub fn has_triple_run(text: &str) -> bool {
    let clusters: Vec<&str> = text.graphemes(true).collect();
    clusters
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Primality test over machine-sized lengths.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_sum_ignores_non_digits() {
        assert_eq!(digit_sum("a1b2c3"), 6);
        assert_eq!(digit_sum(""), 0);
        assert_eq!(digit_sum("no digits"), 0);
        assert_eq!(digit_sum("9 9 7"), 25);
    }

    #[test]
    fn contains_special_excludes_alphanumerics_and_whitespace() {
        assert!(contains_special("a!b"));
        assert!(contains_special("\u{1F525}"));
        assert!(!contains_special("abc 123"));
        assert!(!contains_special(""));
    }

    #[test]
    fn decimal_tokens_scan_signed_values() {
        assert_eq!(decimal_tokens("temp is 68.2 degrees"), vec![68.2]);
        assert_eq!(decimal_tokens("-12.5 then +3"), vec![-12.5, 3.0]);
        assert!(decimal_tokens("no numbers").is_empty());
    }

    #[test]
    fn roman_tokens_split_on_non_roman_chars() {
        assert_eq!(roman_tokens("xiv then VII"), vec!["XIV", "VII"]);
        // Uppercasing first means ordinary words can contribute tokens.
        assert_eq!(roman_tokens("march"), vec!["M", "C"]);
        assert!(roman_tokens("ab").is_empty());
    }

    #[test]
    fn roman_value_handles_subtractive_notation() {
        assert_eq!(roman_value("XIV"), 14);
        assert_eq!(roman_value("VII"), 7);
        assert_eq!(roman_value("V"), 5);
        assert_eq!(roman_value("MCMXCIV"), 1994);
        assert_eq!(roman_value(""), 0);
    }

    #[test]
    fn element_window_normalizes_case() {
        assert!(element_window_present("xNax"));
        assert!(element_window_present("xnAx"));
        assert!(element_window_present("FE"));
        assert!(!element_window_present("qqq"));
        assert!(!element_window_present(""));
    }

    #[test]
    fn atomic_sum_prefers_two_letter_windows() {
        // He + Na, with H and N not double-counted.
        assert_eq!(atomic_sum("HeNa"), 13);
        // Lone letters still count.
        assert_eq!(atomic_sum("H"), 1);
        // H, O, H: "Ho" and "Oh" are not recognized, singles are.
        assert_eq!(atomic_sum("HoH"), 10);
        assert_eq!(atomic_sum(""), 0);
    }

    #[test]
    fn triple_run_uses_grapheme_clusters() {
        assert!(has_triple_run("aaab"));
        assert!(has_triple_run("\u{1F525}\u{1F525}\u{1F525}"));
        assert!(!has_triple_run("aabb"));
        assert!(!has_triple_run("aa"));
    }

    #[test]
    fn primality_small_cases() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(13));
        assert!(!is_prime(15));
    }
}
