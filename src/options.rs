//! Option update commands and builders.
//!
//! Front ends edit a job one field at a time.  Each edit is an explicit
//! [`CardUpdate`] or [`EnvelopeUpdate`] value; applying it goes through
//! a single normalization pass that enforces the shop's eligibility
//! rules (edge paint versus die cutting, folding cards on light stock,
//! which envelope sizes can be lined or addressed, and so on).
//!
//! The pricing components never normalize.  They price whatever
//! specification they are given, so a job built outside these helpers
//! is still priced exactly as written.

use crate::error::{QuoteError, QuoteResult};
use crate::models::{
    CardJob, CardSize, DieCut, EnvelopeJob, EnvelopeSize, EnvelopeType, PaperStock, PaperWeight,
    ReturnAddressLocation, ReturnAddressPrinting, Side, SidePrinting,
};
use serde::{Deserialize, Serialize};

pub const MIN_QUANTITY: u32 = 25;
pub const MAX_QUANTITY: u32 = 1000;
/// Most ink or foil colors a single face can carry.
pub const MAX_COLORS_PER_SIDE: u32 = 4;

fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

fn check_quantity(quantity: u32) -> QuoteResult<()> {
    if (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(QuoteError::InvalidQuantity {
            quantity,
            min: MIN_QUANTITY,
            max: MAX_QUANTITY,
        })
    }
}

/// A single edit to a card job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CardUpdate {
    Quantity(u32),
    Size(CardSize),
    Paper(PaperStock),
    PaperWeight(PaperWeight),
    InkColors { side: Side, count: u32 },
    FoilColors { side: Side, count: u32 },
    DigitalPrinting { side: Side, enabled: bool },
    BlindDeboss { side: Side, enabled: bool },
    BlindEmboss { side: Side, enabled: bool },
    EdgePaint(bool),
    DieCut(DieCut),
}

impl Default for CardJob {
    /// One color on the front of 25 A7 cards, Lettra Pearl at 110 lb.
    fn default() -> Self {
        Self {
            quantity: MIN_QUANTITY,
            size: CardSize::A7,
            paper: PaperStock::LettraPearl,
            paper_weight: PaperWeight::Light,
            front: SidePrinting {
                ink_colors: 1,
                ..SidePrinting::default()
            },
            back: SidePrinting::default(),
            edge_paint: false,
            die_cut: DieCut::None,
        }
    }
}

impl CardJob {
    /// Apply one edit, then re-establish the eligibility rules.
    pub fn apply(&mut self, update: CardUpdate) {
        match update {
            CardUpdate::Quantity(quantity) => self.quantity = clamp_quantity(quantity),
            CardUpdate::Size(size) => self.size = size,
            CardUpdate::Paper(paper) => self.paper = paper,
            CardUpdate::PaperWeight(weight) => self.paper_weight = weight,
            CardUpdate::InkColors { side, count } => {
                self.side_mut(side).ink_colors = count.min(MAX_COLORS_PER_SIDE)
            }
            CardUpdate::FoilColors { side, count } => {
                self.side_mut(side).foil_colors = count.min(MAX_COLORS_PER_SIDE)
            }
            CardUpdate::DigitalPrinting { side, enabled } => self.side_mut(side).digital = enabled,
            CardUpdate::BlindDeboss { side, enabled } => {
                self.side_mut(side).blind_deboss = enabled
            }
            CardUpdate::BlindEmboss { side, enabled } => {
                self.side_mut(side).blind_emboss = enabled
            }
            CardUpdate::EdgePaint(enabled) => {
                self.edge_paint = enabled;
                if enabled {
                    self.die_cut = DieCut::None;
                }
            }
            CardUpdate::DieCut(mode) => {
                self.die_cut = mode;
                if !mode.is_none() {
                    self.edge_paint = false;
                }
            }
        }
        self.normalize();
    }

    /// Clear or adjust options the current size/paper/weight cannot take.
    pub fn normalize(&mut self) {
        let folding = self.size.is_folding();

        if folding && self.paper_weight == PaperWeight::Heavy {
            self.paper_weight = PaperWeight::Light;
        }
        if folding && self.paper.is_handmade() {
            self.paper = PaperStock::LettraPearl;
        }

        let handmade = self.paper.is_handmade();
        if self.edge_paint && (self.paper_weight != PaperWeight::Heavy || handmade) {
            self.edge_paint = false;
        }
        if self.edge_paint && !self.die_cut.is_none() {
            self.die_cut = DieCut::None;
        }

        // Pressure printing on the back needs a folded sheet or a
        // duplexed heavy sheet.
        let back_press_disabled = handmade || (!folding && self.paper_weight != PaperWeight::Heavy);
        if back_press_disabled {
            let back = &mut self.back;
            back.ink_colors = 0;
            back.foil_colors = 0;
            back.blind_deboss = false;
            back.blind_emboss = false;
        }
        if handmade {
            self.back.digital = false;
        }
    }

    /// Reject faces carrying more ink or foil colors than a run can
    /// take.  Update commands clamp to the limit; this catches jobs
    /// that arrive already built.
    pub fn check_color_counts(&self) -> QuoteResult<()> {
        for (side, name) in [(Side::Front, "front"), (Side::Back, "back")] {
            let printing = self.side(side);
            for (process, count) in [("ink", printing.ink_colors), ("foil", printing.foil_colors)] {
                if count > MAX_COLORS_PER_SIDE {
                    return Err(QuoteError::InvalidColorCount {
                        side: name.to_string(),
                        process: process.to_string(),
                        count,
                        max: MAX_COLORS_PER_SIDE,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`CardJob`] from the defaults through update commands.
#[derive(Debug, Clone, Default)]
pub struct CardJobBuilder {
    job: CardJob,
}

impl CardJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing job, e.g. to inherit a suite's quantity.
    pub fn from_job(job: CardJob) -> Self {
        Self { job }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.job.quantity = quantity;
        self
    }

    pub fn size(self, size: CardSize) -> Self {
        self.update(CardUpdate::Size(size))
    }

    pub fn paper(self, paper: PaperStock) -> Self {
        self.update(CardUpdate::Paper(paper))
    }

    pub fn paper_weight(self, weight: PaperWeight) -> Self {
        self.update(CardUpdate::PaperWeight(weight))
    }

    pub fn ink_colors(self, side: Side, count: u32) -> Self {
        self.update(CardUpdate::InkColors { side, count })
    }

    pub fn foil_colors(self, side: Side, count: u32) -> Self {
        self.update(CardUpdate::FoilColors { side, count })
    }

    pub fn digital(self, side: Side, enabled: bool) -> Self {
        self.update(CardUpdate::DigitalPrinting { side, enabled })
    }

    pub fn edge_paint(self, enabled: bool) -> Self {
        self.update(CardUpdate::EdgePaint(enabled))
    }

    pub fn die_cut(self, mode: DieCut) -> Self {
        self.update(CardUpdate::DieCut(mode))
    }

    /// Apply any update command.  Quantity set through here is clamped;
    /// set it with [`CardJobBuilder::quantity`] to have `build` reject
    /// out-of-range values instead.
    pub fn update(mut self, update: CardUpdate) -> Self {
        self.job.apply(update);
        self
    }

    pub fn build(self) -> QuoteResult<CardJob> {
        check_quantity(self.job.quantity)?;
        self.job.check_color_counts()?;
        Ok(self.job)
    }
}

/// A single edit to an envelope job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum EnvelopeUpdate {
    Quantity(u32),
    Size(EnvelopeSize),
    Type(EnvelopeType),
    ReturnAddress(ReturnAddressPrinting),
    ReturnAddressLocation(ReturnAddressLocation),
    GuestAddressing(bool),
    InnerGuestAddressing(bool),
    Liner(bool),
    LinerAssembly(bool),
}

impl EnvelopeSize {
    /// Sizes stocked with a matching inner envelope.
    pub fn supports_double(self) -> bool {
        matches!(self, EnvelopeSize::A7 | EnvelopeSize::A9)
    }

    /// Sizes whose flap leaves room for a return address on the front.
    pub fn supports_front_return_address(self) -> bool {
        matches!(self, EnvelopeSize::A2 | EnvelopeSize::FourBar)
    }

    /// Sizes the addressing printer can feed.
    pub fn supports_guest_addressing(self) -> bool {
        matches!(
            self,
            EnvelopeSize::A6 | EnvelopeSize::A7 | EnvelopeSize::A9 | EnvelopeSize::Square525
        )
    }
}

impl EnvelopeJob {
    /// Plain single A7 envelopes for `quantity` pieces.
    pub fn with_quantity(quantity: u32) -> Self {
        Self {
            quantity,
            size: EnvelopeSize::A7,
            envelope_type: EnvelopeType::Single,
            return_address_printing: ReturnAddressPrinting::None,
            return_address_location: ReturnAddressLocation::Back,
            guest_addressing: false,
            inner_guest_addressing: false,
            liner: false,
            liner_assembly: false,
        }
    }

    pub fn apply(&mut self, update: EnvelopeUpdate) {
        match update {
            EnvelopeUpdate::Quantity(quantity) => self.quantity = clamp_quantity(quantity),
            EnvelopeUpdate::Size(size) => self.size = size,
            EnvelopeUpdate::Type(envelope_type) => self.envelope_type = envelope_type,
            EnvelopeUpdate::ReturnAddress(mode) => self.return_address_printing = mode,
            EnvelopeUpdate::ReturnAddressLocation(location) => {
                self.return_address_location = location
            }
            EnvelopeUpdate::GuestAddressing(enabled) => self.guest_addressing = enabled,
            EnvelopeUpdate::InnerGuestAddressing(enabled) => self.inner_guest_addressing = enabled,
            EnvelopeUpdate::Liner(enabled) => self.liner = enabled,
            EnvelopeUpdate::LinerAssembly(enabled) => self.liner_assembly = enabled,
        }
        self.normalize();
    }

    pub fn normalize(&mut self) {
        if self.is_double() && !self.size.supports_double() {
            self.envelope_type = EnvelopeType::Single;
        }
        if !self.is_double() {
            self.inner_guest_addressing = false;
        }
        if self.return_address_location == ReturnAddressLocation::Front
            && !self.size.supports_front_return_address()
        {
            self.return_address_location = ReturnAddressLocation::Back;
        }
        if !self.size.supports_guest_addressing() {
            self.guest_addressing = false;
            self.inner_guest_addressing = false;
        }
        if !self.liner {
            self.liner_assembly = false;
        }
    }
}

impl Default for EnvelopeJob {
    fn default() -> Self {
        Self::with_quantity(MIN_QUANTITY)
    }
}

/// Builds an [`EnvelopeJob`] from the defaults through update commands.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeJobBuilder {
    job: EnvelopeJob,
}

impl EnvelopeJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.job.quantity = quantity;
        self
    }

    pub fn update(mut self, update: EnvelopeUpdate) -> Self {
        self.job.apply(update);
        self
    }

    pub fn build(self) -> QuoteResult<EnvelopeJob> {
        check_quantity(self.job.quantity)?;
        Ok(self.job)
    }
}
