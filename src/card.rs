//! Card pricing component.
//!
//! [`price_card`] turns a [`CardJob`] and the card tables into an
//! itemized [`CardPrice`].  The computation is pure and never fails:
//! size/weight/paper combinations the tables do not support simply
//! contribute a zero base price, so a live quote can always render.
//!
//! Pricing happens in two stages.  First the job is resolved into an
//! [`EffectiveJob`], which decides the [`PricingStrategy`] once and
//! records the size and weight the base price is computed for.  Every
//! later step reads that immutable value instead of patching a working
//! copy of the options.

use crate::models::{CardJob, CardPrice, CardSize, DieCut, PaperWeight};
use crate::tables::{CardTables, RateTable};
use tracing::{debug, instrument};

/// How a card job is physically produced, as far as pricing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStrategy {
    /// Priced at the size and weight the customer picked.
    Standard,
    /// A double-thick business card printed on both sides.  It is run as
    /// a single-ply small folding card, then perforated and folded over,
    /// so the base price uses `small_f` at 110 lb.
    FoldOverBusinessCard,
}

/// A card job with its pricing strategy resolved.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveJob<'a> {
    /// The job exactly as the caller passed it.
    pub job: &'a CardJob,
    pub strategy: PricingStrategy,
    /// Size used for base-price lookups.
    pub size: CardSize,
    /// Weight used for base-price lookups, before the folding/handmade
    /// light-weight rule is applied.
    pub weight: PaperWeight,
}

impl<'a> EffectiveJob<'a> {
    pub fn resolve(job: &'a CardJob) -> Self {
        let fold_over = job.size == CardSize::BusinessCard
            && job.paper_weight == PaperWeight::Heavy
            && job.back.has_any_printing()
            && !job.paper.is_handmade();

        if fold_over {
            Self {
                job,
                strategy: PricingStrategy::FoldOverBusinessCard,
                size: CardSize::SmallFolded,
                weight: PaperWeight::Light,
            }
        } else {
            Self {
                job,
                strategy: PricingStrategy::Standard,
                size: job.size,
                weight: job.paper_weight,
            }
        }
    }

    pub fn is_fold_over(&self) -> bool {
        self.strategy == PricingStrategy::FoldOverBusinessCard
    }

    /// Heavy stock made by gluing two printed light sheets together.
    pub fn is_standard_duplex(&self) -> bool {
        let job = self.job;
        job.paper_weight == PaperWeight::Heavy
            && !job.size.is_folding()
            && !self.is_fold_over()
            && !job.paper.is_handmade()
            && (job.back.has_any_printing() || job.front.digital)
    }

    /// Folding and handmade work is always calculated at the light weight.
    pub fn calculation_weight(&self) -> PaperWeight {
        if self.size.is_folding() || self.job.paper.is_handmade() {
            PaperWeight::Light
        } else {
            self.weight
        }
    }
}

/// Press passes summed over both faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PassCounts {
    letterpress: u32,
    foil: u32,
    digital: bool,
}

impl PassCounts {
    fn of(job: &CardJob) -> Self {
        Self {
            letterpress: job
                .front
                .letterpress_passes()
                .saturating_add(job.back.letterpress_passes()),
            foil: job.front.foil_passes().saturating_add(job.back.foil_passes()),
            digital: job.uses_digital(),
        }
    }

    fn printing_processes(&self) -> u32 {
        self.letterpress
            .saturating_add(self.foil)
            .saturating_add(u32::from(self.digital))
    }
}

/// Price a single card item.
#[instrument(level = "debug", skip_all, fields(size = ?job.size, quantity = job.quantity))]
pub fn price_card(job: &CardJob, tables: &CardTables) -> CardPrice {
    let rates = &tables.rates;
    let effective = EffectiveJob::resolve(job);
    let quantity = f64::from(job.quantity);

    let base_price = if job.no_printing_selected() {
        0.0
    } else {
        base_price(&effective, tables).unwrap_or_else(|| {
            debug!(
                size = ?effective.size,
                paper = ?job.paper,
                weight = %effective.calculation_weight(),
                "unsupported size/paper combination, base price is zero"
            );
            0.0
        })
    };

    let edge_paint_cost = if job.edge_paint && job.die_cut.is_none() {
        rates.edge_paint_setup + quantity * rates.edge_paint_per_piece
    } else {
        0.0
    };

    let die_cut_cost = match job.die_cut {
        DieCut::None => 0.0,
        DieCut::Stock => rates.die_cut_pass_cost(quantity),
        DieCut::Custom => {
            rates.die_cut_pass_cost(quantity) + rates.custom_die_base_cost
        }
    };

    let duplex_cost = if effective.is_standard_duplex() {
        rates.duplex_setup_cost + (quantity / rates.duplex_iph) * rates.base_labor_rate
    } else if effective.is_fold_over() {
        // Perforating the fold is run like a die-cut pass.
        rates.die_cut_pass_cost(quantity)
    } else {
        0.0
    };

    let total = base_price + edge_paint_cost + die_cut_cost + duplex_cost;

    CardPrice {
        base_price: to_currency(base_price),
        edge_paint_cost: to_currency(edge_paint_cost),
        die_cut_cost: to_currency(die_cut_cost),
        duplex_cost: to_currency(duplex_cost),
        total: to_currency(total),
    }
}

/// Setup, plates, paper, run labor, scoring and digital work.  `None`
/// when the tables do not support the resolved size/weight/paper.
fn base_price(effective: &EffectiveJob<'_>, tables: &CardTables) -> Option<f64> {
    let job = effective.job;
    let rates = &tables.rates;
    let quantity = f64::from(job.quantity);
    let passes = PassCounts::of(job);
    let letterpress = f64::from(passes.letterpress);
    let foil = f64::from(passes.foil);

    let folding = effective.size.is_folding();
    let weight = effective.calculation_weight();
    let spec = tables.card_specs.get(&effective.size)?;
    let sheet_yield = spec.yield_for(weight)?;

    let unsupported = (folding && weight == PaperWeight::Heavy)
        || (!job.paper.is_handmade() && sheet_yield == 0)
        || (folding && job.paper.is_handmade());
    if unsupported {
        return None;
    }

    let setup_cost = (rates.letterpress_setup_hours * letterpress
        + rates.foil_setup_hours * foil)
        * rates.base_labor_rate;

    let mut plate_cost = 0.0;
    if passes.letterpress > 0 {
        plate_cost += spec.plate_inches * rates.photopolymer_plate_cost * letterpress;
    }
    if passes.foil > 0 {
        plate_cost += spec.plate_inches * rates.copper_plate_cost * foil;
    }

    let pieces = pieces_to_produce(job, &passes, rates);
    let paper_cost = paper_cost(effective, tables, pieces, sheet_yield)?;

    let run_hours = quantity * letterpress / rates.letterpress_iph + quantity * foil / rates.foil_iph;
    let run_labor_cost = run_hours * rates.base_labor_rate;

    let mut digital_cost = 0.0;
    if passes.digital {
        let per_side = tables
            .digital_printing_costs
            .get(&effective.size)
            .copied()
            .unwrap_or(0.0)
            * quantity;
        let sides = u32::from(job.front.digital) + u32::from(job.back.digital);
        digital_cost = rates.digital_printing_setup_cost + per_side * f64::from(sides);
    }

    // Folded cards need a scoring pass; the fold-over business card is
    // perforated instead and that is charged as its duplex cost.
    let scoring_cost = if job.size.is_folding() && !effective.is_fold_over() {
        rates.die_cut_pass_cost(quantity)
    } else {
        0.0
    };

    Some(setup_cost + plate_cost + paper_cost + run_labor_cost + scoring_cost + digital_cost)
}

/// Quantity plus makeready sheets plus run waste.
fn pieces_to_produce(job: &CardJob, passes: &PassCounts, rates: &RateTable) -> f64 {
    let processes = passes.printing_processes();
    let mut additional_events = processes.saturating_sub(1);
    if !job.die_cut.is_none() {
        additional_events = additional_events.saturating_add(1);
    }
    if job.edge_paint {
        additional_events = additional_events.saturating_add(1);
    }

    let makeready = rates.base_makeready_sheets
        + f64::from(additional_events) * rates.additional_process_makeready_sheets;
    let quantity = f64::from(job.quantity);
    quantity + makeready + quantity * rates.run_waste_percentage
}

fn paper_cost(
    effective: &EffectiveJob<'_>,
    tables: &CardTables,
    pieces: f64,
    sheet_yield: u32,
) -> Option<f64> {
    let job = effective.job;

    if effective.is_standard_duplex() {
        // Two light sheets per finished piece, priced at the size and
        // paper the customer picked.
        let light_cost = tables
            .paper_costs
            .get(&job.paper)?
            .sheet_cost(PaperWeight::Light)?;
        let light_yield = tables
            .card_specs
            .get(&job.size)?
            .yield_for(PaperWeight::Light)
            .filter(|y| *y > 0)?;
        let sheets = (pieces * 2.0 / f64::from(light_yield)).ceil();
        Some(sheets * light_cost)
    } else if job.paper.is_handmade() {
        let per_piece = tables
            .handmade_paper_costs
            .get(&effective.size)
            .copied()
            .unwrap_or(0.0);
        Some(pieces * per_piece)
    } else {
        let sheet_cost = tables
            .paper_costs
            .get(&job.paper)?
            .sheet_cost(effective.calculation_weight())?;
        let sheets = (pieces / f64::from(sheet_yield)).ceil();
        Some(sheets * sheet_cost)
    }
}

/// Round to the nearest whole currency unit.
pub(crate) fn to_currency(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    }
}
