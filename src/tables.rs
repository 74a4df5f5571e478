//! Rate and specification tables.
//!
//! The `tables` module holds every number the pricing rules read: the
//! shop's rate sheet, the per-size press-sheet specifications, and the
//! paper, digital and envelope cost tables.  Tables are expected to be
//! edited externally (an admin screen, a JSON file on disk) and handed
//! to the engine as an immutable snapshot; [`PricingTables::default`]
//! returns the rate sheet the shop ships with.
//!
//! Missing map entries are meaningful.  A size with no entry for a
//! weight class is unsupported at that weight, which the pricing
//! components treat as a zero contribution rather than an error.

use crate::error::{QuoteError, QuoteResult};
use crate::models::{CardSize, EnvelopeSize, PaperStock, PaperWeight};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Labor, throughput and material rates for card production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Shop labor rate per hour.
    pub base_labor_rate: f64,
    /// Letterpress impressions per hour.
    pub letterpress_iph: f64,
    pub foil_iph: f64,
    pub die_cut_iph: f64,
    pub duplex_iph: f64,
    pub die_cut_setup_hours: f64,
    /// Flat fee for cutting a new custom die.
    pub custom_die_base_cost: f64,
    pub letterpress_setup_hours: f64,
    pub foil_setup_hours: f64,
    /// Cost to change a plate mid-run.  Carried on the rate sheet but not
    /// charged by any current rule.
    pub plate_change_cost: f64,
    pub digital_printing_setup_cost: f64,
    pub duplex_setup_cost: f64,
    /// Photopolymer plate cost per square inch.
    pub photopolymer_plate_cost: f64,
    /// Copper foil die cost per square inch.
    pub copper_plate_cost: f64,
    pub edge_paint_setup: f64,
    pub edge_paint_per_piece: f64,
    pub base_makeready_sheets: f64,
    /// Extra makeready sheets per additional process.
    pub additional_process_makeready_sheets: f64,
    /// Fraction of the run quantity lost to spoilage.
    pub run_waste_percentage: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            base_labor_rate: 100.0,
            letterpress_iph: 800.0,
            foil_iph: 500.0,
            die_cut_iph: 800.0,
            duplex_iph: 200.0,
            die_cut_setup_hours: 0.5,
            custom_die_base_cost: 95.0,
            letterpress_setup_hours: 1.0,
            foil_setup_hours: 1.0,
            plate_change_cost: 25.0,
            digital_printing_setup_cost: 50.0,
            duplex_setup_cost: 55.0,
            photopolymer_plate_cost: 3.0,
            copper_plate_cost: 6.0,
            edge_paint_setup: 50.0,
            edge_paint_per_piece: 0.50,
            base_makeready_sheets: 75.0,
            additional_process_makeready_sheets: 25.0,
            run_waste_percentage: 0.10,
        }
    }
}

impl RateTable {
    /// Labor cost of one die-cutting style pass (setup plus run).  Used
    /// for die cutting, scoring folded cards and perforating fold-over
    /// business cards.
    pub fn die_cut_pass_cost(&self, quantity: f64) -> f64 {
        self.die_cut_setup_hours * self.base_labor_rate
            + (quantity / self.die_cut_iph) * self.base_labor_rate
    }

    /// Reject rate sheets that would produce NaN or infinite prices.
    pub fn validate(&self) -> QuoteResult<()> {
        let throughputs = [
            ("letterpressIph", self.letterpress_iph),
            ("foilIph", self.foil_iph),
            ("dieCutIph", self.die_cut_iph),
            ("duplexIph", self.duplex_iph),
        ];
        for (field, value) in throughputs {
            require_positive(field, value)?;
        }
        let amounts = [
            ("baseLaborRate", self.base_labor_rate),
            ("dieCutSetupHours", self.die_cut_setup_hours),
            ("customDieBaseCost", self.custom_die_base_cost),
            ("letterpressSetupHours", self.letterpress_setup_hours),
            ("foilSetupHours", self.foil_setup_hours),
            ("plateChangeCost", self.plate_change_cost),
            ("digitalPrintingSetupCost", self.digital_printing_setup_cost),
            ("duplexSetupCost", self.duplex_setup_cost),
            ("photopolymerPlateCost", self.photopolymer_plate_cost),
            ("copperPlateCost", self.copper_plate_cost),
            ("edgePaintSetup", self.edge_paint_setup),
            ("edgePaintPerPiece", self.edge_paint_per_piece),
            ("baseMakereadySheets", self.base_makeready_sheets),
            (
                "additionalProcessMakereadySheets",
                self.additional_process_makeready_sheets,
            ),
            ("runWastePercentage", self.run_waste_percentage),
        ];
        for (field, value) in amounts {
            require_non_negative(field, value)?;
        }
        Ok(())
    }
}

/// Rates for envelope printing, addressing and liners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeRateTable {
    pub letterpress_return_address_setup: f64,
    pub letterpress_return_address_run: f64,
    pub foil_return_address_setup: f64,
    pub foil_return_address_run: f64,
    pub digital_return_address: f64,
    pub digital_guest_address: f64,
    pub digital_inner_guest_address: f64,
    pub envelope_liner_assembly_cost: f64,
    pub envelope_printing_makeready: f64,
    pub envelope_printing_waste_percentage: f64,
}

impl Default for EnvelopeRateTable {
    fn default() -> Self {
        Self {
            letterpress_return_address_setup: 135.0,
            letterpress_return_address_run: 0.25,
            foil_return_address_setup: 135.0,
            foil_return_address_run: 0.50,
            digital_return_address: 0.50,
            digital_guest_address: 0.50,
            digital_inner_guest_address: 0.50,
            envelope_liner_assembly_cost: 0.50,
            envelope_printing_makeready: 25.0,
            envelope_printing_waste_percentage: 0.05,
        }
    }
}

impl EnvelopeRateTable {
    pub fn validate(&self) -> QuoteResult<()> {
        let amounts = [
            ("letterpressReturnAddressSetup", self.letterpress_return_address_setup),
            ("letterpressReturnAddressRun", self.letterpress_return_address_run),
            ("foilReturnAddressSetup", self.foil_return_address_setup),
            ("foilReturnAddressRun", self.foil_return_address_run),
            ("digitalReturnAddress", self.digital_return_address),
            ("digitalGuestAddress", self.digital_guest_address),
            ("digitalInnerGuestAddress", self.digital_inner_guest_address),
            ("envelopeLinerAssemblyCost", self.envelope_liner_assembly_cost),
            ("envelopePrintingMakeready", self.envelope_printing_makeready),
            (
                "envelopePrintingWastePercentage",
                self.envelope_printing_waste_percentage,
            ),
        ];
        for (field, value) in amounts {
            require_non_negative(field, value)?;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> QuoteResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QuoteError::invalid_rate(field, value, "must be a positive number"))
    }
}

fn require_non_negative(field: &str, value: f64) -> QuoteResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(QuoteError::invalid_rate(field, value, "must be zero or greater"))
    }
}

fn require_costs<K: Serialize + std::fmt::Debug>(
    table: &str,
    costs: &BTreeMap<K, f64>,
) -> QuoteResult<()> {
    for (key, cost) in costs {
        require_non_negative(&format!("{table}.{}", key_name(key)), *cost)?;
    }
    Ok(())
}

/// The wire name of a table key, as it appears in a table file.
fn key_name<K: Serialize + std::fmt::Debug>(key: &K) -> String {
    match serde_json::to_value(key) {
        Ok(serde_json::Value::String(name)) => name,
        Ok(other) => other.to_string(),
        Err(_) => format!("{key:?}"),
    }
}

/// Sheet yield for one weight class of a size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    /// Finished pieces per printed sheet.
    #[serde(rename = "yield")]
    pub sheet_yield: u32,
}

/// Plate area and per-weight yields for one card size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    /// Plate area in square inches.
    pub plate_inches: f64,
    /// Yield per weight class.  An absent weight is unsupported.
    pub weights: BTreeMap<PaperWeight, WeightSpec>,
}

impl SizeSpec {
    fn new(plate_inches: f64, light_yield: u32, heavy_yield: Option<u32>) -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(PaperWeight::Light, WeightSpec { sheet_yield: light_yield });
        if let Some(sheet_yield) = heavy_yield {
            weights.insert(PaperWeight::Heavy, WeightSpec { sheet_yield });
        }
        Self { plate_inches, weights }
    }

    pub fn yield_for(&self, weight: PaperWeight) -> Option<u32> {
        self.weights.get(&weight).map(|w| w.sheet_yield)
    }
}

/// Per-sheet cost of a paper at one weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetCost {
    pub cost: f64,
}

/// Display name and per-weight sheet costs for one paper stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperInfo {
    pub name: String,
    pub costs: BTreeMap<PaperWeight, SheetCost>,
}

impl PaperInfo {
    fn new(name: &str, light: f64, heavy: f64) -> Self {
        let costs = BTreeMap::from([
            (PaperWeight::Light, SheetCost { cost: light }),
            (PaperWeight::Heavy, SheetCost { cost: heavy }),
        ]);
        Self {
            name: name.to_string(),
            costs,
        }
    }

    pub fn sheet_cost(&self, weight: PaperWeight) -> Option<f64> {
        self.costs.get(&weight).map(|c| c.cost)
    }
}

/// Every table the card component reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTables {
    pub rates: RateTable,
    pub card_specs: BTreeMap<CardSize, SizeSpec>,
    pub paper_costs: BTreeMap<PaperStock, PaperInfo>,
    /// Per finished piece cost of handmade paper, by size.
    pub handmade_paper_costs: BTreeMap<CardSize, f64>,
    /// Per piece, per side cost of digital printing, by size.
    pub digital_printing_costs: BTreeMap<CardSize, f64>,
}

impl Default for CardTables {
    fn default() -> Self {
        use CardSize::*;

        let card_specs = BTreeMap::from([
            (A7, SizeSpec::new(48.0, 20, Some(9))),
            (A9, SizeSpec::new(61.75, 16, Some(8))),
            (A8, SizeSpec::new(56.0, 16, Some(8))),
            (A2, SizeSpec::new(35.0, 30, Some(15))),
            (A6, SizeSpec::new(40.0, 24, Some(12))),
            (FourBar, SizeSpec::new(33.0, 30, Some(15))),
            (BusinessCard, SizeSpec::new(13.5, 56, Some(28))),
            (A7Folded, SizeSpec::new(48.0, 10, None)),
            (A2Folded, SizeSpec::new(35.0, 12, None)),
            (A6Folded, SizeSpec::new(40.0, 11, None)),
            (FourBarFolded, SizeSpec::new(33.0, 18, None)),
            (SmallFolded, SizeSpec::new(27.0, 30, None)),
            (Square525, SizeSpec::new(48.0, 20, Some(9))),
        ]);

        let paper_costs = BTreeMap::from([
            (
                PaperStock::LettraPearl,
                PaperInfo::new("Crane's Lettra Pearl White", 8.0, 10.0),
            ),
            (
                PaperStock::LettraFluorescent,
                PaperInfo::new("Crane's Lettra Fluorescent White", 8.0, 10.0),
            ),
            (PaperStock::Handmade, PaperInfo::new("Handmade Paper", 0.0, 0.0)),
        ]);

        let handmade_paper_costs = BTreeMap::from([
            (BusinessCard, 0.85),
            (FourBar, 1.10),
            (A2, 1.25),
            (A6, 1.40),
            (A7, 1.50),
            (A8, 1.60),
            (A9, 1.75),
            (Square525, 1.50),
        ]);

        let digital_printing_costs = BTreeMap::from([
            (BusinessCard, 0.50),
            (SmallFolded, 0.90),
            (FourBar, 0.60),
            (FourBarFolded, 1.10),
            (A2, 0.65),
            (A2Folded, 1.20),
            (A6, 0.70),
            (A6Folded, 1.30),
            (A7, 0.76),
            (A7Folded, 1.40),
            (A8, 0.80),
            (A9, 0.85),
            (Square525, 0.76),
        ]);

        Self {
            rates: RateTable::default(),
            card_specs,
            paper_costs,
            handmade_paper_costs,
            digital_printing_costs,
        }
    }
}

impl CardTables {
    /// Validate the rate sheet and every cost, plate area and sheet
    /// price in the lookup tables.
    pub fn validate(&self) -> QuoteResult<()> {
        self.rates.validate()?;
        for (size, spec) in &self.card_specs {
            let field = format!("cardSpecs.{}.plateInches", key_name(size));
            require_non_negative(&field, spec.plate_inches)?;
        }
        for (paper, info) in &self.paper_costs {
            for (weight, sheet) in &info.costs {
                let field = format!("paperCosts.{}.costs.{}", key_name(paper), key_name(weight));
                require_non_negative(&field, sheet.cost)?;
            }
        }
        require_costs("handmadePaperCosts", &self.handmade_paper_costs)?;
        require_costs("digitalPrintingCosts", &self.digital_printing_costs)
    }
}

/// Every table the envelope component reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeTables {
    pub rates: EnvelopeRateTable,
    /// Blank stock cost per envelope.
    pub envelope_costs: BTreeMap<EnvelopeSize, f64>,
    /// Printed liner cost per envelope.
    pub liner_costs: BTreeMap<EnvelopeSize, f64>,
}

impl Default for EnvelopeTables {
    fn default() -> Self {
        use EnvelopeSize::*;

        Self {
            rates: EnvelopeRateTable::default(),
            envelope_costs: BTreeMap::from([
                (FourBar, 0.45),
                (A2, 0.55),
                (A6, 0.65),
                (A7, 0.75),
                (A9, 0.95),
                (Square525, 0.85),
            ]),
            liner_costs: BTreeMap::from([
                (FourBar, 1.25),
                (A2, 1.35),
                (A6, 1.45),
                (A7, 1.55),
                (A9, 1.65),
                (Square525, 1.65),
            ]),
        }
    }
}

impl EnvelopeTables {
    pub fn validate(&self) -> QuoteResult<()> {
        self.rates.validate()?;
        require_costs("envelopeCosts", &self.envelope_costs)?;
        require_costs("linerCosts", &self.liner_costs)
    }
}

/// A complete snapshot of the configuration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTables {
    pub card: CardTables,
    pub envelope: EnvelopeTables,
}

impl PricingTables {
    pub fn validate(&self) -> QuoteResult<()> {
        self.card.validate()?;
        self.envelope.validate()
    }
}

/// Load a table snapshot from a JSON file.
///
/// The file must contain a full [`PricingTables`] document; partial
/// overrides are not merged with the defaults.  The loaded rates are
/// validated before being returned.
pub fn load_tables_from_file(path: &Path) -> QuoteResult<PricingTables> {
    let data = std::fs::read_to_string(path)
        .map_err(|err| QuoteError::table_load(path.display().to_string(), err.to_string()))?;
    let tables: PricingTables = serde_json::from_str(&data)
        .map_err(|err| QuoteError::table_load(path.display().to_string(), err.to_string()))?;
    tables.validate()?;
    info!(path = %path.display(), sizes = tables.card.card_specs.len(), "loaded pricing tables");
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables_are_valid() {
        assert!(PricingTables::default().validate().is_ok());
    }

    #[test]
    fn test_folding_sizes_only_support_light_weight() {
        let tables = CardTables::default();
        for size in [
            CardSize::SmallFolded,
            CardSize::FourBarFolded,
            CardSize::A2Folded,
            CardSize::A6Folded,
            CardSize::A7Folded,
        ] {
            let spec = &tables.card_specs[&size];
            assert!(spec.yield_for(PaperWeight::Light).is_some());
            assert_eq!(spec.yield_for(PaperWeight::Heavy), None);
        }
    }

    #[test]
    fn test_zero_throughput_rejected() {
        let mut rates = RateTable::default();
        rates.duplex_iph = 0.0;
        let err = rates.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RATE_TABLE");
        assert!(err.to_string().contains("duplexIph"));
    }

    #[test]
    fn test_negative_envelope_rate_rejected() {
        let mut rates = EnvelopeRateTable::default();
        rates.digital_guest_address = -0.5;
        assert!(rates.validate().is_err());
    }

    #[test]
    fn test_invalid_lookup_costs_rejected() {
        let mut tables = PricingTables::default();
        tables.card.handmade_paper_costs.insert(CardSize::A7, f64::NAN);
        let err = tables.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RATE_TABLE");
        assert!(err.to_string().contains("handmadePaperCosts.a7"));

        let mut tables = PricingTables::default();
        if let Some(info) = tables.card.paper_costs.get_mut(&PaperStock::LettraPearl) {
            info.costs.insert(PaperWeight::Heavy, SheetCost { cost: -1.0 });
        }
        let err = tables.card.validate().unwrap_err();
        assert!(err.to_string().contains("paperCosts.lettra_pearl.costs.220"));

        let mut tables = PricingTables::default();
        if let Some(spec) = tables.card.card_specs.get_mut(&CardSize::A2) {
            spec.plate_inches = f64::INFINITY;
        }
        assert!(tables.card.validate().is_err());

        let mut tables = PricingTables::default();
        tables.envelope.liner_costs.insert(EnvelopeSize::A9, -0.5);
        let err = tables.envelope.validate().unwrap_err();
        assert!(err.to_string().contains("linerCosts.a9"));
        assert!(tables.card.validate().is_ok());
    }

    #[test]
    fn test_weight_keys_serialize_as_numbers() {
        let json = serde_json::to_value(&CardTables::default()).unwrap();
        assert_eq!(json["cardSpecs"]["a7"]["weights"]["220"]["yield"], 9);
        assert_eq!(json["paperCosts"]["lettra_pearl"]["costs"]["110"]["cost"], 8.0);
    }

    #[test]
    fn test_load_tables_from_file() {
        let mut tables = PricingTables::default();
        tables.card.rates.base_labor_rate = 120.0;
        let path = std::env::temp_dir().join(format!("press_quote_tables_{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(serde_json::to_string(&tables).unwrap().as_bytes())
            .unwrap();
        drop(file);

        let loaded = load_tables_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_tables_from_file(Path::new("/nonexistent/tables.json")).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_LOAD");
        assert!(err.to_string().contains("/nonexistent/tables.json"));
    }
}
