//! Control glyphs and grapheme-cluster position arithmetic.
//!
//! Every position in a buffer is measured in grapheme clusters, never in
//! bytes or code points. Multi-codepoint sequences (ZWJ emoji, variation
//! selectors) count as a single indivisible unit for slicing, insertion,
//! and adjacency checks.

use unicode_segmentation::UnicodeSegmentation;

/// The moving actor of the escort automaton.
pub const MARKER: &str = "\u{1F95A}"; // 🥚

/// The fixed terminal position the marker must reach.
pub const HOME: &str = "\u{1F3E0}"; // 🏠

/// An obstacle token; collision with it resets the automaton.
pub const HAZARD: &str = "\u{1F525}"; // 🔥

/// Companion glyph consumed by the fire-drill rule. Freely typable.
pub const EXTINGUISHER: &str = "\u{1F9EF}"; // 🧯

/// Base scalar shared by every strength-glyph variant (🏋️, 🏋️‍♂️, 🏋️‍♀️).
pub const STRENGTH_BASE: char = '\u{1F3CB}';

/// Returns the grapheme clusters of `text` in order.
#[must_use]
pub fn clusters(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Number of grapheme clusters in `text`.
#[must_use]
pub fn cluster_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// The grapheme cluster at cluster index `idx`, if any.
#[must_use]
pub fn cluster_at(text: &str, idx: usize) -> Option<&str> {
    text.graphemes(true).nth(idx)
}

/// Inserts `piece` at cluster index `idx` (clamped to the end).
///
/// The insertion point always falls on a cluster boundary, so composite
/// glyphs are never split.
#[must_use]
pub fn insert_at(text: &str, idx: usize, piece: &str) -> String {
    let byte_pos = text
        .grapheme_indices(true)
        .nth(idx)
        .map_or(text.len(), |(pos, _)| pos);

    let mut out = String::with_capacity(text.len() + piece.len());
    out.push_str(&text[..byte_pos]);
    out.push_str(piece);
    out.push_str(&text[byte_pos..]);
    out
}

/// True if `cluster` is one of the reserved control glyphs.
#[must_use]
pub fn is_control(cluster: &str) -> bool {
    cluster == MARKER || cluster == HOME || cluster == HAZARD
}

/// Removes every control glyph cluster from `text`.
///
/// User input passes through this before it is written into a buffer core,
/// so typed marker/home/hazard glyphs never forge automaton state.
#[must_use]
pub fn strip_control(text: &str) -> String {
    text.graphemes(true).filter(|g| !is_control(g)).collect()
}

/// Counts strength glyphs, treating every gender/presentation variant as one.
#[must_use]
pub fn strength_count(text: &str) -> usize {
    text.graphemes(true)
        .filter(|g| g.chars().next() == Some(STRENGTH_BASE))
        .count()
}
