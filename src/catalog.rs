//! Display catalog for sizes.
//!
//! Human readable names and trim dimensions for the card and envelope
//! sizes, plus the envelope that fits each card.  The pricing rules
//! depend only on [`CardSize::is_folding`]; the rest is for front ends
//! rendering a quote.

use crate::models::{CardSize, EnvelopeSize};

impl CardSize {
    pub const ALL: [CardSize; 13] = [
        CardSize::BusinessCard,
        CardSize::SmallFolded,
        CardSize::FourBar,
        CardSize::FourBarFolded,
        CardSize::A2,
        CardSize::A2Folded,
        CardSize::A6,
        CardSize::A6Folded,
        CardSize::A7,
        CardSize::A7Folded,
        CardSize::Square525,
        CardSize::A8,
        CardSize::A9,
    ];

    /// Folding variants are printed flat and scored.
    pub fn is_folding(self) -> bool {
        matches!(
            self,
            CardSize::SmallFolded
                | CardSize::FourBarFolded
                | CardSize::A2Folded
                | CardSize::A6Folded
                | CardSize::A7Folded
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CardSize::BusinessCard => "Business Card",
            CardSize::SmallFolded => "Small Folding Card",
            CardSize::FourBar => "4-Bar Card",
            CardSize::FourBarFolded => "4-Bar Folded Card",
            CardSize::A2 => "A2 Card",
            CardSize::A2Folded => "A2 Folded Card",
            CardSize::A6 => "A6 Card",
            CardSize::A6Folded => "A6 Folded Card",
            CardSize::A7 => "A7 Card",
            CardSize::A7Folded => "A7 Folded Card",
            CardSize::Square525 => "5.25\" Square Card",
            CardSize::A8 => "A8 Card",
            CardSize::A9 => "A9 Card",
        }
    }

    pub fn dimensions(self) -> &'static str {
        match self {
            CardSize::BusinessCard => "3.5 x 2 in",
            CardSize::SmallFolded => "3.5 x 4 in (folds to 3.5 x 2 in)",
            CardSize::FourBar => "3.5 x 4.875 in",
            CardSize::FourBarFolded => "7 x 4.875 in (folds to 3.5 x 4.875 in)",
            CardSize::A2 => "4.25 x 5.5 in",
            CardSize::A2Folded => "8.5 x 5.5 in (folds to 4.25 x 5.5 in)",
            CardSize::A6 => "4.5 x 6.25 in",
            CardSize::A6Folded => "9 x 6.25 in (folds to 4.5 x 6.25 in)",
            CardSize::A7 => "5 x 7 in",
            CardSize::A7Folded => "10 x 7 in (folds to 5 x 7 in)",
            CardSize::Square525 => "5.25 x 5.25 in",
            CardSize::A8 => "5.25 x 7.875 in",
            CardSize::A9 => "5.5 x 8.5 in",
        }
    }

    /// The envelope a card of this size mails in, if the shop stocks one.
    pub fn matching_envelope(self) -> Option<EnvelopeSize> {
        match self {
            CardSize::FourBar | CardSize::FourBarFolded => Some(EnvelopeSize::FourBar),
            CardSize::A2 | CardSize::A2Folded => Some(EnvelopeSize::A2),
            CardSize::A6 | CardSize::A6Folded => Some(EnvelopeSize::A6),
            CardSize::A7 | CardSize::A7Folded => Some(EnvelopeSize::A7),
            CardSize::A9 => Some(EnvelopeSize::A9),
            CardSize::Square525 => Some(EnvelopeSize::Square525),
            CardSize::BusinessCard | CardSize::SmallFolded | CardSize::A8 => None,
        }
    }
}

impl EnvelopeSize {
    pub const ALL: [EnvelopeSize; 6] = [
        EnvelopeSize::FourBar,
        EnvelopeSize::A2,
        EnvelopeSize::A6,
        EnvelopeSize::A7,
        EnvelopeSize::A9,
        EnvelopeSize::Square525,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            EnvelopeSize::FourBar => "4-Bar Envelope",
            EnvelopeSize::A2 => "A2 Envelope",
            EnvelopeSize::A6 => "A6 Envelope",
            EnvelopeSize::A7 => "A7 Envelope",
            EnvelopeSize::A9 => "A9 Envelope",
            EnvelopeSize::Square525 => "5.5\" Square Envelope",
        }
    }

    pub fn dimensions(self) -> &'static str {
        match self {
            EnvelopeSize::FourBar => "3.625 x 5.125 in",
            EnvelopeSize::A2 => "4.375 x 5.75 in",
            EnvelopeSize::A6 => "4.75 x 6.5 in",
            EnvelopeSize::A7 => "5.25 x 7.25 in",
            EnvelopeSize::A9 => "5.75 x 8.75 in",
            EnvelopeSize::Square525 => "5.5 x 5.5 in",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folding_matches_identifier_suffix() {
        for size in CardSize::ALL {
            let id = serde_json::to_value(size).unwrap();
            let id = id.as_str().unwrap().to_string();
            assert_eq!(size.is_folding(), id.ends_with('f'), "{id}");
        }
    }

    #[test]
    fn test_matching_envelopes() {
        assert_eq!(CardSize::A7Folded.matching_envelope(), Some(EnvelopeSize::A7));
        assert_eq!(CardSize::BusinessCard.matching_envelope(), None);
        assert_eq!(CardSize::A8.matching_envelope(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CardSize::SmallFolded.display_name(), "Small Folding Card");
        assert_eq!(EnvelopeSize::A7.dimensions(), "5.25 x 7.25 in");
    }
}
