//! Envelope pricing component.
//!
//! An envelope item is blank stock plus optional return-address
//! printing, guest addressing and printed liners.  Unlike cards there
//! is no itemized breakdown: the component returns one total, rounded
//! once at the end.

use crate::card::to_currency;
use crate::models::{EnvelopeJob, EnvelopePrice, ReturnAddressPrinting};
use crate::tables::EnvelopeTables;
use tracing::{instrument, warn};

/// Price a single envelope item.
///
/// A size missing from the blank-stock table prices to zero and logs a
/// warning; the rest of a suite is unaffected.
#[instrument(level = "debug", skip_all, fields(size = ?job.size, quantity = job.quantity))]
pub fn price_envelope(job: &EnvelopeJob, tables: &EnvelopeTables) -> EnvelopePrice {
    let Some(&unit_cost) = tables.envelope_costs.get(&job.size) else {
        warn!(size = ?job.size, "no blank envelope cost configured, pricing as zero");
        return EnvelopePrice::default();
    };

    let rates = &tables.rates;
    let quantity = f64::from(job.quantity);
    let overage = rates.envelope_printing_makeready + quantity * rates.envelope_printing_waste_percentage;

    let mut outer_needed = quantity;
    if job.has_outer_printing() {
        outer_needed += overage;
    }

    // Inner guest addressing only counts when the job really is double.
    let blank_cost = if job.is_double() {
        let mut inner_needed = quantity;
        if job.inner_guest_addressing {
            inner_needed += overage;
        }
        (outer_needed + inner_needed) * unit_cost
    } else {
        outer_needed * unit_cost
    };

    let return_address_cost = match job.return_address_printing {
        ReturnAddressPrinting::None => 0.0,
        ReturnAddressPrinting::Letterpress => {
            rates.letterpress_return_address_setup + quantity * rates.letterpress_return_address_run
        }
        ReturnAddressPrinting::Foil => {
            rates.foil_return_address_setup + quantity * rates.foil_return_address_run
        }
        ReturnAddressPrinting::Digital => quantity * rates.digital_return_address,
    };

    let mut guest_address_cost = 0.0;
    if job.guest_addressing {
        guest_address_cost += quantity * rates.digital_guest_address;
    }
    if job.is_double() && job.inner_guest_addressing {
        guest_address_cost += quantity * rates.digital_inner_guest_address;
    }

    let mut liner_cost = 0.0;
    if job.liner {
        let per_liner = tables.liner_costs.get(&job.size).copied().unwrap_or(0.0);
        liner_cost = per_liner * quantity;
        if job.liner_assembly {
            liner_cost += rates.envelope_liner_assembly_cost * quantity;
        }
    }

    EnvelopePrice {
        total: to_currency(blank_cost + return_address_cost + guest_address_cost + liner_cost),
    }
}
