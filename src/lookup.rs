//! Static lookup tables used by the rule checks.
//!
//! Month names, sponsor brands, affirmations, and the periodic-table data
//! are fixed for the session and matched by simple substring or window
//! scans; no locale-aware matching.

/// Month names, lowercase.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Sponsor keywords, lowercase.
pub const BRANDS: [&str; 3] = ["pepsi", "starbucks", "shell"];

/// Accepted affirmation phrases, lowercase.
pub const AFFIRMATIONS: [&str; 3] = ["i am loved", "i am worthy", "i am enough"];

/// Two-letter element symbols in title case.
const TWO_LETTER_SYMBOLS: [&str; 89] = [
    "He", "Li", "Be", "Ne", "Na", "Mg", "Al", "Si", "Cl", "Ar", "Ca", "Sc", "Ti", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Zr", "Nb",
    "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "Xe", "Cs", "Ba", "La",
    "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf",
    "Ta", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra",
    "Ac", "Th", "Pa", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
];

/// Atomic numbers for the symbols recognized by the summation rule
/// (elements 1 through 30).
const ATOMIC_NUMBERS: [(&str, u32); 30] = [
    ("H", 1),
    ("He", 2),
    ("Li", 3),
    ("Be", 4),
    ("B", 5),
    ("C", 6),
    ("N", 7),
    ("O", 8),
    ("F", 9),
    ("Ne", 10),
    ("Na", 11),
    ("Mg", 12),
    ("Al", 13),
    ("Si", 14),
    ("P", 15),
    ("S", 16),
    ("Cl", 17),
    ("Ar", 18),
    ("K", 19),
    ("Ca", 20),
    ("Sc", 21),
    ("Ti", 22),
    ("V", 23),
    ("Cr", 24),
    ("Mn", 25),
    ("Fe", 26),
    ("Co", 27),
    ("Ni", 28),
    ("Cu", 29),
    ("Zn", 30),
];

/// True if `symbol` (title case) is a two-letter element symbol.
#[must_use]
pub fn is_two_letter_symbol(symbol: &str) -> bool {
    TWO_LETTER_SYMBOLS.contains(&symbol)
}

/// Atomic number for `symbol` (exact case), if recognized by the
/// summation rule.
#[must_use]
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ATOMIC_NUMBERS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, n)| *n)
}

/// True if `c` is a vowel (case-insensitive).
#[must_use]
pub fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_letter_symbols_are_title_case_only() {
        assert!(is_two_letter_symbol("Na"));
        assert!(is_two_letter_symbol("He"));
        assert!(!is_two_letter_symbol("NA"));
        assert!(!is_two_letter_symbol("na"));
        assert!(!is_two_letter_symbol("Xx"));
    }

    #[test]
    fn atomic_numbers_cover_both_symbol_widths() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("He"), Some(2));
        assert_eq!(atomic_number("Na"), Some(11));
        assert_eq!(atomic_number("Zn"), Some(30));
        // Beyond element 30 the summation rule does not recognize it.
        assert_eq!(atomic_number("Ga"), None);
        assert_eq!(atomic_number("h"), None);
    }

    #[test]
    fn vowels_ignore_case() {
        assert!(is_vowel('a'));
        assert!(is_vowel('E'));
        assert!(!is_vowel('y'));
        assert!(!is_vowel('1'));
    }
}
