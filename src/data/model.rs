use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// OrderRecord – one row of the source table (one order line)
// ---------------------------------------------------------------------------

/// A single order line. One order can span several lines, so `order_id`
/// repeats across records while `price` is per line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    /// Two-letter state code of the buying customer.
    pub customer_state: String,
    /// Purchase timestamp, truncated to day precision.
    pub purchase_date: NaiveDate,
    /// Product category name; empty when the source row has no category.
    pub category: String,
    pub price: f64,
}

/// Last 8 characters of a customer id, or the whole id if shorter.
/// Matches how the source data abbreviates customers for display.
pub fn short_customer_label(customer_id: &str) -> &str {
    match customer_id.char_indices().rev().nth(7) {
        Some((idx, _)) => &customer_id[idx..],
        None => customer_id,
    }
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices.
/// Rows are sorted by purchase date at construction time.
#[derive(Debug, Clone)]
pub struct OrderDataset {
    /// All order lines, ascending by `purchase_date`.
    pub orders: Vec<OrderRecord>,
    /// Sorted distinct customer states.
    pub states: Vec<String>,
    /// Sorted distinct product categories (empty category excluded).
    pub categories: Vec<String>,
    /// Earliest purchase date in the dataset.
    pub min_date: NaiveDate,
    /// Latest purchase date in the dataset.
    pub max_date: NaiveDate,
}

impl OrderDataset {
    /// Sort the rows by date and build the state / category indices.
    /// Returns `None` for an empty input: a dataset without a date range
    /// has nothing to drive the UI with.
    pub fn from_orders(mut orders: Vec<OrderRecord>) -> Option<Self> {
        if orders.is_empty() {
            return None;
        }
        orders.sort_by_key(|o| o.purchase_date);

        let mut states: BTreeSet<String> = BTreeSet::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();
        for o in &orders {
            states.insert(o.customer_state.clone());
            if !o.category.is_empty() {
                categories.insert(o.category.clone());
            }
        }

        let min_date = orders.first().map(|o| o.purchase_date)?;
        let max_date = orders.last().map(|o| o.purchase_date)?;

        Some(OrderDataset {
            orders,
            states: states.into_iter().collect(),
            categories: categories.into_iter().collect(),
            min_date,
            max_date,
        })
    }

    /// Number of order lines.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Inclusive date range covered by the dataset.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, self.max_date)
    }
}
