//! Data models for the Press Quote engine.
//!
//! The `models` module defines the serialisable job specifications,
//! option enums and price records that flow through the engine.  Every
//! type here is a plain value object: callers build a fresh
//! specification per pricing call and the engine never keeps one
//! around between calls.
//!
//! On the wire, records use camelCase field names and enums use their
//! snake_case identifiers (`"business_card"`, `"lettra_pearl"`), so a
//! JSON front end can post its option objects unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card (or folding card) trim size.
///
/// Sizes whose identifier ends in `f` are folding variants: they are
/// printed flat on a larger sheet, scored and folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    BusinessCard,
    #[serde(rename = "small_f")]
    SmallFolded,
    FourBar,
    #[serde(rename = "four_bar_f")]
    FourBarFolded,
    A2,
    #[serde(rename = "a2f")]
    A2Folded,
    A6,
    #[serde(rename = "a6f")]
    A6Folded,
    A7,
    #[serde(rename = "a7f")]
    A7Folded,
    A8,
    A9,
    #[serde(rename = "square_5_25")]
    Square525,
}

/// Envelope size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeSize {
    FourBar,
    A2,
    A6,
    A7,
    A9,
    #[serde(rename = "square_5_25")]
    Square525,
}

/// Paper stock.  `Handmade` is priced per finished piece instead of per
/// press sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperStock {
    LettraPearl,
    LettraFluorescent,
    Handmade,
}

impl PaperStock {
    pub fn is_handmade(self) -> bool {
        matches!(self, PaperStock::Handmade)
    }
}

/// Paper weight class in pounds.  The heavier class is produced by
/// duplexing two light sheets, except for the fold-over business card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum PaperWeight {
    /// Single thickness (110 lb).
    Light,
    /// Double thickness (220 lb).
    Heavy,
}

impl PaperWeight {
    pub fn pounds(self) -> u16 {
        match self {
            PaperWeight::Light => 110,
            PaperWeight::Heavy => 220,
        }
    }
}

impl TryFrom<u16> for PaperWeight {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            110 => Ok(PaperWeight::Light),
            220 => Ok(PaperWeight::Heavy),
            other => Err(format!("unsupported paper weight {other}, expected 110 or 220")),
        }
    }
}

impl From<PaperWeight> for u16 {
    fn from(weight: PaperWeight) -> Self {
        weight.pounds()
    }
}

impl fmt::Display for PaperWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}lb", self.pounds())
    }
}

/// Die-cutting mode.  `Stock` uses a die from the shop's library,
/// `Custom` pays for a new die.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieCut {
    #[default]
    None,
    Stock,
    Custom,
}

impl DieCut {
    pub fn is_none(self) -> bool {
        matches!(self, DieCut::None)
    }
}

/// Which face of a card an update refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

/// Printing attributes for one face of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidePrinting {
    /// Number of letterpress ink colors (one plate and pass each).
    pub ink_colors: u32,
    /// Number of foil colors (one copper die and pass each).
    pub foil_colors: u32,
    /// Full-color digital printing on this face.
    pub digital: bool,
    /// Blind (inkless) deboss pass.
    pub blind_deboss: bool,
    /// Blind (foilless) emboss pass.
    pub blind_emboss: bool,
}

impl SidePrinting {
    /// Ink colors plus a deboss pass, each needing a photopolymer plate.
    pub fn letterpress_passes(&self) -> u32 {
        self.ink_colors.saturating_add(u32::from(self.blind_deboss))
    }

    /// Foil colors plus an emboss pass, each needing a copper die.
    pub fn foil_passes(&self) -> u32 {
        self.foil_colors.saturating_add(u32::from(self.blind_emboss))
    }

    /// Any pressure process: ink, foil, deboss or emboss.
    pub fn has_press_work(&self) -> bool {
        self.letterpress_passes() > 0 || self.foil_passes() > 0
    }

    pub fn has_any_printing(&self) -> bool {
        self.has_press_work() || self.digital
    }
}

/// Full description of one printed card item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardJob {
    pub quantity: u32,
    pub size: CardSize,
    pub paper: PaperStock,
    pub paper_weight: PaperWeight,
    #[serde(default)]
    pub front: SidePrinting,
    #[serde(default)]
    pub back: SidePrinting,
    #[serde(default)]
    pub edge_paint: bool,
    #[serde(default)]
    pub die_cut: DieCut,
}

impl CardJob {
    pub fn side(&self, side: Side) -> &SidePrinting {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SidePrinting {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }

    /// True when no ink, foil, deboss, emboss or digital work is
    /// selected on either face.
    pub fn no_printing_selected(&self) -> bool {
        !self.front.has_any_printing() && !self.back.has_any_printing()
    }

    pub fn uses_digital(&self) -> bool {
        self.front.digital || self.back.digital
    }
}

/// Single outer envelope, or outer plus inner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeType {
    #[default]
    Single,
    Double,
}

/// How the return address is printed on the outer envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnAddressPrinting {
    #[default]
    None,
    Letterpress,
    Foil,
    Digital,
}

/// Where the return address sits.  Affects eligibility only, never cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnAddressLocation {
    Front,
    #[default]
    Back,
}

/// Full description of one envelope item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeJob {
    pub quantity: u32,
    pub size: EnvelopeSize,
    #[serde(rename = "type", default)]
    pub envelope_type: EnvelopeType,
    #[serde(default)]
    pub return_address_printing: ReturnAddressPrinting,
    #[serde(default)]
    pub return_address_location: ReturnAddressLocation,
    #[serde(default)]
    pub guest_addressing: bool,
    #[serde(default)]
    pub inner_guest_addressing: bool,
    #[serde(default)]
    pub liner: bool,
    #[serde(default)]
    pub liner_assembly: bool,
}

impl EnvelopeJob {
    pub fn is_double(&self) -> bool {
        matches!(self.envelope_type, EnvelopeType::Double)
    }

    /// Any printing on the outer envelope, which costs makeready and
    /// run waste in blank stock.
    pub fn has_outer_printing(&self) -> bool {
        self.return_address_printing != ReturnAddressPrinting::None || self.guest_addressing
    }
}

/// Itemized price of a card, every component in whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPrice {
    pub base_price: u64,
    pub edge_paint_cost: u64,
    pub die_cut_cost: u64,
    pub duplex_cost: u64,
    pub total: u64,
}

/// Price of an envelope item in whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopePrice {
    pub total: u64,
}

/// One entry of a suite, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SuiteItem {
    Card {
        id: u64,
        name: String,
        options: CardJob,
    },
    Envelope {
        id: u64,
        name: String,
        options: EnvelopeJob,
    },
}

impl SuiteItem {
    pub fn id(&self) -> u64 {
        match self {
            SuiteItem::Card { id, .. } | SuiteItem::Envelope { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SuiteItem::Card { name, .. } | SuiteItem::Envelope { name, .. } => name,
        }
    }
}

/// Price fields of a suite item, matching its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemPricing {
    Card { options: CardJob, price: CardPrice },
    Envelope {
        options: EnvelopeJob,
        price: EnvelopePrice,
    },
}

/// Whether an item produced a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PricingStatus {
    Priced,
    Unpriced { reason: String },
}

/// The result of pricing a single suite item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub id: u64,
    pub name: String,
    /// Item total; zero when the item could not be priced.
    pub total: u64,
    #[serde(flatten)]
    pub status: PricingStatus,
    #[serde(flatten)]
    pub pricing: ItemPricing,
}

/// The aggregate result of pricing a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitePricing {
    /// Individual results, in input order.
    pub item_prices: Vec<PricedItem>,
    pub grand_total: u64,
}
