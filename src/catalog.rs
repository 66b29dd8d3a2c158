//! The ordered rule catalog.
//!
//! Built once from the session seed and the two live-collaborator states,
//! then immutable until a collaborator resolves (which swaps the affected
//! rule's check and label in a rebuild). Catalog order is part of the
//! contract: it decides disclosure order, not just grouping.

use crate::live::{Definition, LiveStatus, Reading};
use crate::rules::{Rule, RuleCheck, RuleId};
use crate::seed::SessionSeed;

/// Tolerance accepted by the temperature rule, in degrees.
pub const TEMPERATURE_TOLERANCE: f64 = 3.0;

/// An ordered, immutable-per-session list of rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Builds the session catalog.
    ///
    /// Labels for the forbidden-letter and live rules are computed here and
    /// then frozen; nothing in the catalog recomputes at evaluation time.
    #[must_use]
    pub fn build(
        seed: &SessionSeed,
        dictionary: &LiveStatus<Definition>,
        temperature: &LiveStatus<Reading>,
    ) -> Self {
        let [first, second] = seed.forbidden;
        let mut rules = Vec::with_capacity(26);

        // Structural.
        rules.push(Rule::new(
            RuleId::MIN_LENGTH,
            "At least 5 characters.",
            RuleCheck::MinLength { min: 5 },
        ));
        rules.push(Rule::new(
            RuleId::LOWERCASE,
            "Must include a lowercase letter.",
            RuleCheck::ContainsLowercase,
        ));
        rules.push(Rule::new(
            RuleId::UPPERCASE,
            "Must include an uppercase letter.",
            RuleCheck::ContainsUppercase,
        ));
        rules.push(Rule::new(
            RuleId::DIGIT,
            "Must include a number.",
            RuleCheck::ContainsDigit,
        ));
        rules.push(Rule::new(
            RuleId::SPECIAL,
            "Must include a special character.",
            RuleCheck::ContainsSpecial,
        ));

        // Numeric and content puzzles.
        rules.push(Rule::new(
            RuleId::MONTH,
            "Include a month name (e.g. March).",
            RuleCheck::MonthName,
        ));
        rules.push(Rule::new(
            RuleId::SPONSOR,
            "Include one of our sponsors: pepsi, starbucks, or shell.",
            RuleCheck::SponsorBrand,
        ));
        rules.push(Rule::new(
            RuleId::ROMAN_PRESENT,
            "Include a Roman numeral (I, V, X, L, C, D, M).",
            RuleCheck::RomanPresent,
        ));
        rules.push(Rule::new(
            RuleId::DIGIT_SUM,
            "Digits must sum to 25.",
            RuleCheck::DigitSum { target: 25 },
        ));
        rules.push(Rule::new(
            RuleId::ROMAN_PRODUCT,
            "Roman numerals must multiply to 35.",
            RuleCheck::RomanProduct { target: 35 },
        ));

        // Stateful and emoji puzzles.
        rules.push(Rule::new(
            RuleId::FIRE_DRILL,
            "Every \u{1F525} needs a \u{1F9EF} on standby.",
            RuleCheck::FireDrill,
        ));
        rules.push(Rule::new(
            RuleId::NO_TRIPLE_RUN,
            "No character may appear three times in a row.",
            RuleCheck::NoTripleRun,
        ));
        rules.push(Rule::new(
            RuleId::STARTS_LETTER,
            "Must start with a letter.",
            RuleCheck::StartsWithLetter,
        ));
        rules.push(Rule::new(
            RuleId::TWO_WORDS,
            "At least two words.",
            RuleCheck::MinWords { min: 2 },
        ));

        // Domain trivia.
        rules.push(Rule::new(
            RuleId::ELEMENT,
            "Include a two-letter element symbol (e.g. He, Na, Fe).",
            RuleCheck::ElementSymbol,
        ));
        rules.push(Rule::new(
            RuleId::ATOMIC_SUM,
            "Atomic numbers of element symbols must sum to at least 200.",
            RuleCheck::AtomicSum { min: 200 },
        ));
        rules.push(Rule::new(
            RuleId::STRENGTH,
            "Needs 4 of the strength emoji \u{1F3CB}\u{FE0F}.",
            RuleCheck::StrengthCount { min: 4 },
        ));

        // Meta and linguistic.
        rules.push(Rule::new(
            RuleId::FORBIDDEN_LETTERS,
            format!("You may NOT use these letters: {first}, {second}."),
            RuleCheck::ForbiddenLetters {
                letters: seed.forbidden,
            },
        ));
        rules.push(Rule::new(
            RuleId::VOWELS,
            "At least 3 vowels.",
            RuleCheck::MinVowels { min: 3 },
        ));
        rules.push(Rule::new(
            RuleId::TRIMMED,
            "No leading or trailing whitespace.",
            RuleCheck::Trimmed,
        ));
        rules.push(Rule::new(
            RuleId::AFFIRMATION,
            "Include one affirmation: \"i am loved\", \"i am worthy\", or \"i am enough\".",
            RuleCheck::Affirmation,
        ));
        rules.push(Rule::new(
            RuleId::OWN_LENGTH,
            "Must contain its own length as a number.",
            RuleCheck::OwnLength,
        ));
        rules.push(Rule::new(
            RuleId::PRIME_LENGTH,
            "Length must be a prime number.",
            RuleCheck::PrimeLength,
        ));

        // Live collaborators.
        rules.push(dictionary_rule(dictionary));
        rules.push(temperature_rule(temperature));

        // The automaton.
        rules.push(Rule::new(
            RuleId::ESCORT,
            "Walk the \u{1F95A} home: it must stand beside the \u{1F3E0} with every \u{1F525} cleared.",
            RuleCheck::EscortComplete,
        ));

        Self { rules }
    }

    /// The rules in catalog order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if the catalog holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Identifiers in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.iter().map(|r| r.id)
    }

    /// True if `id` is in the catalog.
    #[must_use]
    pub fn contains(&self, id: RuleId) -> bool {
        self.rules.iter().any(|r| r.id == id)
    }

    /// Resolves a user-supplied id string to a catalog id.
    #[must_use]
    pub fn id_for(&self, name: &str) -> Option<RuleId> {
        self.rules.iter().map(|r| r.id).find(|id| id.as_str() == name)
    }

    /// Stable content fingerprint: the catalog-identity component of any
    /// evaluation cache key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for rule in &self.rules {
            hasher.update(rule.id.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(rule.label.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn dictionary_rule(status: &LiveStatus<Definition>) -> Rule {
    match status {
        LiveStatus::Pending => Rule::new(
            RuleId::DICTIONARY,
            "Fetching today's word from the dictionary...",
            RuleCheck::Unsatisfiable,
        ),
        LiveStatus::Failed => Rule::new(
            RuleId::DICTIONARY,
            "Dictionary unavailable; rule skipped.",
            RuleCheck::AutoPass,
        ),
        LiveStatus::Ready(def) => Rule::new(
            RuleId::DICTIONARY,
            format!(
                "Include today's word \"{}\" ({}).",
                def.word, def.definition
            ),
            RuleCheck::ContainsWord {
                word: def.word.clone(),
            },
        ),
    }
}

fn temperature_rule(status: &LiveStatus<Reading>) -> Rule {
    match status {
        LiveStatus::Pending => Rule::new(
            RuleId::TEMPERATURE,
            "Waiting for the current temperature...",
            RuleCheck::Unsatisfiable,
        ),
        LiveStatus::Failed => Rule::new(
            RuleId::TEMPERATURE,
            "Temperature unavailable; rule skipped.",
            RuleCheck::AutoPass,
        ),
        LiveStatus::Ready(reading) => Rule::new(
            RuleId::TEMPERATURE,
            format!(
                "Include the current temperature: within {TEMPERATURE_TOLERANCE} degrees of {} Fahrenheit.",
                reading.rounded()
            ),
            RuleCheck::TemperatureNear {
                reading: reading.rounded(),
                tolerance: TEMPERATURE_TOLERANCE,
            },
        ),
    }
}
