//! Rule identifiers and checks.
//!
//! A check is a closed enum over the predicates the catalog can hold; every
//! parameter lives in the variant itself, so a rule is a plain value with
//! no captured state. Checks are pure and total: any string, including the
//! empty string or one made only of control glyphs, yields a boolean.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::glyphs::{self, EXTINGUISHER, HAZARD, HOME, MARKER};
use crate::lookup;
use crate::scan;

/// Stable identifier of a rule within the session catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RuleId(&'static str);

impl RuleId {
    /// At least five clusters.
    pub const MIN_LENGTH: Self = Self("min-length");
    /// Contains a lowercase letter.
    pub const LOWERCASE: Self = Self("lowercase");
    /// Contains an uppercase letter.
    pub const UPPERCASE: Self = Self("uppercase");
    /// Contains a decimal digit.
    pub const DIGIT: Self = Self("digit");
    /// Contains a special character.
    pub const SPECIAL: Self = Self("special");
    /// Contains a month name.
    pub const MONTH: Self = Self("month");
    /// Contains a sponsor keyword.
    pub const SPONSOR: Self = Self("sponsor");
    /// Contains a Roman numeral token.
    pub const ROMAN_PRESENT: Self = Self("roman-present");
    /// Digits sum to the target.
    pub const DIGIT_SUM: Self = Self("digit-sum");
    /// Roman numeral tokens multiply to the target.
    pub const ROMAN_PRODUCT: Self = Self("roman-product");
    /// Hazards demand an extinguisher.
    pub const FIRE_DRILL: Self = Self("fire-drill");
    /// No three identical consecutive clusters.
    pub const NO_TRIPLE_RUN: Self = Self("no-triple-run");
    /// Starts with a letter.
    pub const STARTS_LETTER: Self = Self("starts-letter");
    /// At least two whitespace-separated words.
    pub const TWO_WORDS: Self = Self("two-words");
    /// Contains a two-letter element symbol.
    pub const ELEMENT: Self = Self("element");
    /// Atomic-number summation threshold.
    pub const ATOMIC_SUM: Self = Self("atomic-sum");
    /// Strength-glyph count threshold.
    pub const STRENGTH: Self = Self("strength");
    /// Forbidden-letter exclusion.
    pub const FORBIDDEN_LETTERS: Self = Self("forbidden-letters");
    /// Vowel count threshold.
    pub const VOWELS: Self = Self("vowels");
    /// No leading or trailing whitespace.
    pub const TRIMMED: Self = Self("trimmed");
    /// Contains an affirmation phrase.
    pub const AFFIRMATION: Self = Self("affirmation");
    /// Contains its own length as a number.
    pub const OWN_LENGTH: Self = Self("own-length");
    /// Length is prime.
    pub const PRIME_LENGTH: Self = Self("prime-length");
    /// Live dictionary word.
    pub const DICTIONARY: Self = Self("dictionary");
    /// Live temperature proximity.
    pub const TEMPERATURE: Self = Self("temperature");
    /// Marker-automaton success condition; governs both periodic tasks.
    pub const ESCORT: Self = Self("escort");

    /// Every identifier the crate defines, in catalog order.
    pub const ALL: [Self; 26] = [
        Self::MIN_LENGTH,
        Self::LOWERCASE,
        Self::UPPERCASE,
        Self::DIGIT,
        Self::SPECIAL,
        Self::MONTH,
        Self::SPONSOR,
        Self::ROMAN_PRESENT,
        Self::DIGIT_SUM,
        Self::ROMAN_PRODUCT,
        Self::FIRE_DRILL,
        Self::NO_TRIPLE_RUN,
        Self::STARTS_LETTER,
        Self::TWO_WORDS,
        Self::ELEMENT,
        Self::ATOMIC_SUM,
        Self::STRENGTH,
        Self::FORBIDDEN_LETTERS,
        Self::VOWELS,
        Self::TRIMMED,
        Self::AFFIRMATION,
        Self::OWN_LENGTH,
        Self::PRIME_LENGTH,
        Self::DICTIONARY,
        Self::TEMPERATURE,
        Self::ESCORT,
    ];

    /// The identifier as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Resolves a name to a known identifier.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.0 == name)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Predicates a catalog rule can enforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Minimum length in grapheme clusters.
    MinLength {
        /// Required cluster count.
        min: usize,
    },

    /// Contains a lowercase letter.
    ContainsLowercase,

    /// Contains an uppercase letter.
    ContainsUppercase,

    /// Contains a decimal digit.
    ContainsDigit,

    /// Contains a character outside alphanumerics and whitespace.
    ContainsSpecial,

    /// Contains a month name, case-insensitively.
    MonthName,

    /// Contains a sponsor keyword, case-insensitively.
    SponsorBrand,

    /// Contains at least one Roman numeral token.
    RomanPresent,

    /// Digits sum to exactly the target.
    DigitSum {
        /// Required digit sum.
        target: u32,
    },

    /// Roman numeral tokens with value above one multiply to the target.
    RomanProduct {
        /// Required product.
        target: u32,
    },

    /// Any hazard glyph demands an extinguisher glyph somewhere in the text.
    FireDrill,

    /// No grapheme cluster appears three times in a row.
    NoTripleRun,

    /// The first character is alphabetic.
    StartsWithLetter,

    /// Minimum whitespace-separated word count.
    MinWords {
        /// Required word count.
        min: usize,
    },

    /// Some two-character window is a two-letter element symbol.
    ElementSymbol,

    /// Atomic-number summation meets a floor.
    AtomicSum {
        /// Required minimum sum.
        min: u32,
    },

    /// Strength-glyph count meets a floor, any variant.
    StrengthCount {
        /// Required glyph count.
        min: usize,
    },

    /// Neither forbidden letter appears, case-insensitively.
    ForbiddenLetters {
        /// The two letters chosen for the session.
        letters: [char; 2],
    },

    /// Vowel count meets a floor.
    MinVowels {
        /// Required vowel count.
        min: usize,
    },

    /// No leading or trailing whitespace.
    Trimmed,

    /// Contains one of the affirmation phrases.
    Affirmation,

    /// Contains its own cluster length as a decimal substring.
    OwnLength,

    /// Cluster length is a prime number.
    PrimeLength,

    /// Contains the given word, case-insensitively.
    ContainsWord {
        /// Word supplied by the dictionary collaborator.
        word: String,
    },

    /// Some signed decimal token lies within tolerance of the reading.
    TemperatureNear {
        /// Rounded reading to compare against.
        reading: f64,
        /// Accepted absolute distance.
        tolerance: f64,
    },

    /// Never satisfied; stands in while a collaborator is loading.
    Unsatisfiable,

    /// Always satisfied; stands in for a skipped rule.
    AutoPass,

    /// Marker immediately beside home, zero hazards anywhere.
    EscortComplete,
}

impl RuleCheck {
    /// Evaluates the check against rendered text.
    #[must_use]
    pub fn evaluate(&self, text: &str) -> bool {
        match self {
            Self::MinLength { min } => glyphs::cluster_len(text) >= *min,
            Self::ContainsLowercase => text.chars().any(char::is_lowercase),
            Self::ContainsUppercase => text.chars().any(char::is_uppercase),
            Self::ContainsDigit => text.chars().any(|c| c.is_ascii_digit()),
            Self::ContainsSpecial => scan::contains_special(text),
            Self::MonthName => {
                let lc = text.to_lowercase();
                lookup::MONTHS.iter().any(|m| lc.contains(m))
            }
            Self::SponsorBrand => {
                let lc = text.to_lowercase();
                lookup::BRANDS.iter().any(|b| lc.contains(b))
            }
            Self::RomanPresent => !scan::roman_tokens(text).is_empty(),
            Self::DigitSum { target } => scan::digit_sum(text) == *target,
            Self::RomanProduct { target } => {
                let values: Vec<u64> = scan::roman_tokens(text)
                    .iter()
                    .map(|t| u64::from(scan::roman_value(t)))
                    .filter(|&v| v > 1)
                    .collect();
                values.len() >= 2
                    && values.iter().fold(1_u64, |acc, &v| acc.saturating_mul(v))
                        == u64::from(*target)
            }
            Self::FireDrill => !text.contains(HAZARD) || text.contains(EXTINGUISHER),
            Self::NoTripleRun => !scan::has_triple_run(text),
            Self::StartsWithLetter => text.chars().next().is_some_and(char::is_alphabetic),
            Self::MinWords { min } => text.split_whitespace().count() >= *min,
            Self::ElementSymbol => scan::element_window_present(text),
            Self::AtomicSum { min } => scan::atomic_sum(text) >= *min,
            Self::StrengthCount { min } => glyphs::strength_count(text) >= *min,
            Self::ForbiddenLetters { letters } => {
                let lc = text.to_lowercase();
                !letters.iter().any(|&l| lc.contains(l))
            }
            Self::MinVowels { min } => scan::vowel_count(text) >= *min,
            Self::Trimmed => text.trim() == text,
            Self::Affirmation => {
                let lc = text.to_lowercase();
                lookup::AFFIRMATIONS.iter().any(|a| lc.contains(a))
            }
            Self::OwnLength => text.contains(&glyphs::cluster_len(text).to_string()),
            Self::PrimeLength => scan::is_prime(glyphs::cluster_len(text)),
            Self::ContainsWord { word } => text.to_lowercase().contains(&word.to_lowercase()),
            Self::TemperatureNear { reading, tolerance } => scan::decimal_tokens(text)
                .iter()
                .any(|t| (t - reading).abs() <= *tolerance),
            Self::Unsatisfiable => false,
            Self::AutoPass => true,
            Self::EscortComplete => {
                let clusters = glyphs::clusters(text);
                let clear = !clusters.iter().any(|c| *c == HAZARD);
                let adjacent = clusters
                    .windows(2)
                    .any(|w| w[0] == MARKER && w[1] == HOME);
                clear && adjacent
            }
        }
    }
}

/// A named, ordered catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Stable identifier.
    pub id: RuleId,
    /// Display label; frozen at catalog construction.
    pub label: String,
    /// The predicate this rule enforces.
    pub check: RuleCheck,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(id: RuleId, label: impl Into<String>, check: RuleCheck) -> Self {
        Self {
            id,
            label: label.into(),
            check,
        }
    }
}
