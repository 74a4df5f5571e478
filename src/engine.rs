//! Suite aggregation engine.
//!
//! The `engine` module is responsible for turning an ordered list of
//! [`SuiteItem`]s into a [`SuitePricing`].  It uses the [`rayon`] crate
//! to price items across multiple CPU cores; items never depend on each
//! other, so the only ordering concern is keeping the output in input
//! order, which `collect` on an indexed parallel iterator guarantees.
//!
//! Pricing is fault isolated per item.  An item that cannot be priced
//! is reported as unpriced with a zero total and the rest of the suite
//! is priced normally.

use crate::card::price_card;
use crate::envelope::price_envelope;
use crate::error::QuoteResult;
use crate::models::{
    CardPrice, EnvelopePrice, ItemPricing, PricedItem, PricingStatus, SuiteItem, SuitePricing,
};
use crate::tables::PricingTables;
use rayon::prelude::*;
use tracing::{info, warn};

/// Prices a suite against a table snapshot.
pub fn price_suite(items: &[SuiteItem], tables: &PricingTables) -> SuitePricing {
    let item_prices: Vec<PricedItem> = items
        .par_iter()
        .map(|item| price_item(item, tables))
        .collect();

    let grand_total: u64 = item_prices.iter().map(|p| p.total).sum();
    let unpriced = item_prices
        .iter()
        .filter(|p| matches!(p.status, PricingStatus::Unpriced { .. }))
        .count();
    info!(items = item_prices.len(), unpriced, grand_total, "priced suite");

    SuitePricing {
        item_prices,
        grand_total,
    }
}

/// Prices one suite item, never failing: errors become an unpriced entry.
pub fn price_item(item: &SuiteItem, tables: &PricingTables) -> PricedItem {
    match try_price_item(item, tables) {
        Ok(pricing) => {
            let total = match &pricing {
                ItemPricing::Card { price, .. } => price.total,
                ItemPricing::Envelope { price, .. } => price.total,
            };
            PricedItem {
                id: item.id(),
                name: item.name().to_string(),
                total,
                status: PricingStatus::Priced,
                pricing,
            }
        }
        Err(err) => {
            warn!(id = item.id(), name = item.name(), error = %err, "item left unpriced");
            let pricing = match item {
                SuiteItem::Card { options, .. } => ItemPricing::Card {
                    options: options.clone(),
                    price: CardPrice::default(),
                },
                SuiteItem::Envelope { options, .. } => ItemPricing::Envelope {
                    options: options.clone(),
                    price: EnvelopePrice::default(),
                },
            };
            PricedItem {
                id: item.id(),
                name: item.name().to_string(),
                total: 0,
                status: PricingStatus::Unpriced {
                    reason: err.to_string(),
                },
                pricing,
            }
        }
    }
}

fn try_price_item(item: &SuiteItem, tables: &PricingTables) -> QuoteResult<ItemPricing> {
    match item {
        SuiteItem::Card { options, .. } => {
            tables.card.validate()?;
            options.check_color_counts()?;
            Ok(ItemPricing::Card {
                options: options.clone(),
                price: price_card(options, &tables.card),
            })
        }
        SuiteItem::Envelope { options, .. } => {
            tables.envelope.validate()?;
            Ok(ItemPricing::Envelope {
                options: options.clone(),
                price: price_envelope(options, &tables.envelope),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardJob, EnvelopeJob, EnvelopeSize, EnvelopeType};
    use serde_json::json;

    fn wedding_suite() -> Vec<SuiteItem> {
        vec![
            SuiteItem::Card {
                id: 1,
                name: "Card #1".into(),
                options: CardJob::default(),
            },
            SuiteItem::Envelope {
                id: 2,
                name: "Envelopes".into(),
                options: EnvelopeJob::with_quantity(100),
            },
            SuiteItem::Card {
                id: 3,
                name: "Card #2".into(),
                options: CardJob {
                    quantity: 100,
                    size: crate::models::CardSize::A7Folded,
                    front: crate::models::SidePrinting {
                        ink_colors: 2,
                        ..Default::default()
                    },
                    ..CardJob::default()
                },
            },
        ]
    }

    #[test]
    fn test_grand_total_is_sum_of_items() {
        let pricing = price_suite(&wedding_suite(), &PricingTables::default());
        let totals: Vec<u64> = pricing.item_prices.iter().map(|p| p.total).collect();
        assert_eq!(totals, vec![295, 75, 744]);
        assert_eq!(pricing.grand_total, 295 + 75 + 744);
    }

    #[test]
    fn test_order_preserved() {
        let items: Vec<SuiteItem> = (0..64)
            .map(|i| SuiteItem::Envelope {
                id: i,
                name: format!("Envelopes {i}"),
                options: EnvelopeJob::with_quantity(25 + i as u32),
            })
            .collect();
        let pricing = price_suite(&items, &PricingTables::default());
        let ids: Vec<u64> = pricing.item_prices.iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..64).collect::<Vec<u64>>());
    }

    #[test]
    fn test_reordering_does_not_change_total() {
        let tables = PricingTables::default();
        let mut items = wedding_suite();
        let forward = price_suite(&items, &tables).grand_total;
        items.reverse();
        assert_eq!(price_suite(&items, &tables).grand_total, forward);
    }

    #[test]
    fn test_bad_card_rates_do_not_block_envelopes() {
        let mut tables = PricingTables::default();
        tables.card.rates.letterpress_iph = 0.0;
        let pricing = price_suite(&wedding_suite(), &tables);

        let first = &pricing.item_prices[0];
        assert_eq!(first.total, 0);
        match &first.status {
            PricingStatus::Unpriced { reason } => assert!(reason.contains("letterpressIph")),
            PricingStatus::Priced => panic!("card should be unpriced"),
        }
        assert_eq!(pricing.item_prices[1].status, PricingStatus::Priced);
        assert_eq!(pricing.grand_total, 75);
    }

    #[test]
    fn test_oversized_card_does_not_block_envelopes() {
        let card: CardJob = serde_json::from_value(json!({
            "quantity": 25,
            "size": "a7",
            "paper": "lettra_pearl",
            "paperWeight": 110,
            "front": { "inkColors": u32::MAX, "blindDeboss": true },
            "back": { "foilColors": 1 }
        }))
        .unwrap();
        let items = vec![
            SuiteItem::Card {
                id: 1,
                name: "Card #1".into(),
                options: card,
            },
            SuiteItem::Envelope {
                id: 2,
                name: "Envelopes".into(),
                options: EnvelopeJob::with_quantity(100),
            },
        ];
        let pricing = price_suite(&items, &PricingTables::default());

        let first = &pricing.item_prices[0];
        assert_eq!(first.total, 0);
        match &first.status {
            PricingStatus::Unpriced { reason } => assert!(reason.contains("ink colors")),
            PricingStatus::Priced => panic!("card should be unpriced"),
        }
        assert_eq!(pricing.item_prices[1].status, PricingStatus::Priced);
        assert_eq!(pricing.item_prices[1].total, 75);
        assert_eq!(pricing.grand_total, 75);
    }

    #[test]
    fn test_bad_envelope_costs_do_not_block_cards() {
        let mut tables = PricingTables::default();
        tables.envelope.envelope_costs.insert(EnvelopeSize::A7, f64::NAN);
        let pricing = price_suite(&wedding_suite()[..2], &tables);
        assert_eq!(pricing.item_prices[0].total, 295);
        assert!(matches!(
            pricing.item_prices[1].status,
            PricingStatus::Unpriced { .. }
        ));
        assert_eq!(pricing.grand_total, 295);
    }

    #[test]
    fn test_double_envelope_not_assumed() {
        let mut envelope = EnvelopeJob::with_quantity(100);
        envelope.inner_guest_addressing = true;
        let items = vec![SuiteItem::Envelope {
            id: 9,
            name: "Envelopes".into(),
            options: envelope.clone(),
        }];
        let tables = PricingTables::default();
        assert_eq!(price_suite(&items, &tables).grand_total, 75);

        envelope.envelope_type = EnvelopeType::Double;
        let items = vec![SuiteItem::Envelope {
            id: 9,
            name: "Envelopes".into(),
            options: envelope,
        }];
        assert_eq!(price_suite(&items, &tables).grand_total, 223);
    }

    #[test]
    fn test_priced_item_wire_shape() {
        let pricing = price_suite(&wedding_suite()[..2], &PricingTables::default());
        let value = serde_json::to_value(&pricing).unwrap();
        assert_eq!(value["grandTotal"], json!(370));
        let card = &value["itemPrices"][0];
        assert_eq!(card["type"], json!("card"));
        assert_eq!(card["status"], json!("priced"));
        assert_eq!(card["total"], json!(295));
        assert_eq!(card["price"]["basePrice"], json!(295));
        assert_eq!(card["price"]["duplexCost"], json!(0));
        assert_eq!(card["options"]["size"], json!("a7"));
        let envelope = &value["itemPrices"][1];
        assert_eq!(envelope["type"], json!("envelope"));
        assert_eq!(envelope["total"], json!(75));
    }

    #[test]
    fn test_empty_suite() {
        let pricing = price_suite(&[], &PricingTables::default());
        assert!(pricing.item_prices.is_empty());
        assert_eq!(pricing.grand_total, 0);
    }
}
