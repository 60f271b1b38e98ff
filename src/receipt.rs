use crate::money::{Figure, Money};
use anyhow::{Context, Result, bail};
use num_traits::Zero;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line item as handed over by the external receipt reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub product_name: String,
    #[serde(default)]
    pub gallons: f64,
    #[serde(default)]
    pub cost: f64,
}

const DIESEL_KEYWORDS: [&str; 8] = [
    "diesel", "dsl", "fuel", "reefer", "trkds", "trk dsl", "auto dsl", "trk diesel",
];
const DEF_KEYWORDS: [&str; 2] = ["def", "adblue"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Product {
    Diesel,
    Def,
}

/// Case-insensitive substring match against the two keyword sets;
/// anything else on the receipt is ignored.
fn classify(product_name: &str) -> Option<Product> {
    let name = product_name.to_lowercase();
    if DIESEL_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        Some(Product::Diesel)
    } else if DEF_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        Some(Product::Def)
    } else {
        None
    }
}

/// Fuel spend recognized on one receipt, after the per-gallon discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelExpense {
    pub diesel_gallons: Decimal,
    pub diesel_cost: Money,
    /// Discount actually applied; never pushes the diesel cost below zero.
    pub discount: Money,
    pub def_cost: Money,
    pub total: Money,
}

/// Classifies receipt line items and totals the recognized fuel spend.
/// Fails when nothing reads as diesel or DEF, or when what does read sums
/// to nothing, so the caller can ask for a clearer photo instead of booking
/// a zero expense.
pub fn fuel_expense(items: &[ReceiptItem], discount_per_gallon: Money) -> Result<FuelExpense> {
    let mut diesel_gallons = Decimal::zero();
    let mut diesel_cost = Money::zero();
    let mut def_cost = Money::zero();
    let mut recognized = 0usize;
    for item in items {
        let gallons = Decimal::from_f64(item.gallons)
            .unwrap_or_default()
            .max(Decimal::zero());
        let cost = Money::lenient(Some(&Figure::Number(item.cost)))
            .to_cents()
            .max(Money::zero());
        match classify(&item.product_name) {
            Some(Product::Diesel) => {
                recognized += 1;
                diesel_gallons += gallons;
                diesel_cost += cost;
            }
            Some(Product::Def) => {
                recognized += 1;
                def_cost += cost;
            }
            None => {}
        }
    }
    if recognized == 0 {
        bail!("No recognizable fuel or DEF items on receipt");
    }
    let discount = (discount_per_gallon * diesel_gallons)
        .to_cents()
        .clamp(Money::zero(), diesel_cost);
    let total = diesel_cost - discount + def_cost;
    if total <= Money::zero() {
        bail!("Recognized fuel and DEF items sum to nothing");
    }
    Ok(FuelExpense {
        diesel_gallons,
        diesel_cost,
        discount,
        def_cost,
        total,
    })
}

/// Reads receipt line items from a yaml doc produced by the receipt reader.
pub fn items_from_doc(doc: &str) -> Result<Vec<ReceiptItem>> {
    serde_yaml::from_str(doc).with_context(|| format!("Failed to deserialize receipt items:\n{}", doc))
}

impl fmt::Display for FuelExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = 12;
        writeln!(
            f,
            "{:<10} {:>8} gal {:>pad$}",
            "Diesel",
            self.diesel_gallons.to_string(),
            self.diesel_cost.to_string()
        )?;
        writeln!(
            f,
            "{:<10} {:>12} {:>pad$}",
            "Discount",
            "",
            (-self.discount).to_string()
        )?;
        writeln!(f, "{:<10} {:>12} {:>pad$}", "DEF", "", self.def_cost.to_string())?;
        write!(f, "{:<10} {:>12} {:>pad$}", "Total", "", self.total.to_string())
    }
}
