use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::model::{OrderDataset, short_customer_label};

// ---------------------------------------------------------------------------
// Monthly sales trend
// ---------------------------------------------------------------------------

/// Revenue total for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    /// First day of the month, used as the x coordinate.
    pub month: NaiveDate,
    pub total: f64,
}

/// Group the selected order lines by calendar month and sum their prices.
/// Output is sorted ascending by month.
pub fn monthly_sales_trend(dataset: &OrderDataset, indices: &[usize]) -> Vec<MonthlySales> {
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &i in indices {
        let o = &dataset.orders[i];
        let month = first_of_month(o.purchase_date);
        *by_month.entry(month).or_insert(0.0) += o.price;
    }
    by_month
        .into_iter()
        .map(|(month, total)| MonthlySales { month, total })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // from_ymd_opt cannot fail for day 1 of an existing month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Product insights
// ---------------------------------------------------------------------------

/// Order-line count for one product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Top `n` product categories by number of order lines, descending.
/// Rows without a category are skipped; ties break alphabetically so the
/// ranking is stable across runs.
pub fn top_categories_by_count(
    dataset: &OrderDataset,
    indices: &[usize],
    n: usize,
) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in indices {
        let o = &dataset.orders[i];
        if o.category.is_empty() {
            continue;
        }
        *counts.entry(o.category.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration is alphabetical, so a stable sort keeps that
    // order among equal counts.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Geographic analysis
// ---------------------------------------------------------------------------

/// Summed revenue for one customer state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSales {
    pub state: String,
    pub total: f64,
}

/// Revenue per customer state, descending.  One row per distinct state
/// present in the selection.
pub fn sales_by_state(dataset: &OrderDataset, indices: &[usize]) -> Vec<StateSales> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for &i in indices {
        let o = &dataset.orders[i];
        *totals.entry(o.customer_state.as_str()).or_insert(0.0) += o.price;
    }

    let mut ranked: Vec<StateSales> = totals
        .into_iter()
        .map(|(state, total)| StateSales {
            state: state.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked
}

// ---------------------------------------------------------------------------
// Customer segmentation (RFM)
// ---------------------------------------------------------------------------

/// Recency / frequency / monetary metrics for one customer, computed over
/// the filtered selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRfm {
    pub customer_id: String,
    /// Days since the customer's last purchase, relative to the latest
    /// purchase date in the selection (0 = bought on the last day).
    pub recency_days: i64,
    /// Number of distinct orders.
    pub frequency: usize,
    /// Summed price across all of the customer's order lines.
    pub monetary: f64,
    pub last_purchase: NaiveDate,
}

impl CustomerRfm {
    /// Short display label (last 8 chars of the customer id).
    pub fn label(&self) -> &str {
        short_customer_label(&self.customer_id)
    }
}

/// Compute per-customer RFM metrics over the selection.  Output is sorted
/// by customer id; rankings are derived separately.
pub fn customer_rfm(dataset: &OrderDataset, indices: &[usize]) -> Vec<CustomerRfm> {
    struct Acc<'a> {
        orders: BTreeSet<&'a str>,
        monetary: f64,
        last_purchase: NaiveDate,
    }

    let mut latest: Option<NaiveDate> = None;
    let mut per_customer: BTreeMap<&str, Acc<'_>> = BTreeMap::new();

    for &i in indices {
        let o = &dataset.orders[i];
        latest = Some(latest.map_or(o.purchase_date, |d| d.max(o.purchase_date)));
        let acc = per_customer
            .entry(o.customer_id.as_str())
            .or_insert_with(|| Acc {
                orders: BTreeSet::new(),
                monetary: 0.0,
                last_purchase: o.purchase_date,
            });
        acc.orders.insert(o.order_id.as_str());
        acc.monetary += o.price;
        acc.last_purchase = acc.last_purchase.max(o.purchase_date);
    }

    let Some(latest) = latest else {
        return Vec::new();
    };

    per_customer
        .into_iter()
        .map(|(customer_id, acc)| CustomerRfm {
            customer_id: customer_id.to_string(),
            recency_days: (latest - acc.last_purchase).num_days(),
            frequency: acc.orders.len(),
            monetary: acc.monetary,
            last_purchase: acc.last_purchase,
        })
        .collect()
}

/// Top `n` customers by recency (fewest days since last purchase first).
pub fn top_by_recency(metrics: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    let mut ranked = metrics.to_vec();
    ranked.sort_by(|a, b| a.recency_days.cmp(&b.recency_days));
    ranked.truncate(n);
    ranked
}

/// Top `n` customers by number of distinct orders.
pub fn top_by_frequency(metrics: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    let mut ranked = metrics.to_vec();
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranked.truncate(n);
    ranked
}

/// Top `n` customers by total spend.
pub fn top_by_monetary(metrics: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    let mut ranked = metrics.to_vec();
    ranked.sort_by(|a, b| b.monetary.total_cmp(&a.monetary));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Value segments
// ---------------------------------------------------------------------------

/// Monetary-value segment, split at the 0.6 and 0.8 quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueSegment {
    Low,
    Medium,
    High,
}

impl fmt::Display for ValueSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSegment::Low => write!(f, "Low Value"),
            ValueSegment::Medium => write!(f, "Medium Value"),
            ValueSegment::High => write!(f, "High Value"),
        }
    }
}

/// Customer count per value segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCount {
    pub segment: ValueSegment,
    pub count: usize,
}

/// Split customers into Low / Medium / High value by their monetary total,
/// cut at the 0.6 and 0.8 quantiles of the observed distribution.
/// Always returns the three segments in Low → High order.
pub fn value_segments(metrics: &[CustomerRfm]) -> Vec<SegmentCount> {
    let mut sorted: Vec<f64> = metrics.iter().map(|m| m.monetary).collect();
    sorted.sort_by(f64::total_cmp);

    let q60 = quantile(&sorted, 0.6);
    let q80 = quantile(&sorted, 0.8);

    let mut counts = [0usize; 3];
    for m in metrics {
        let idx = if m.monetary <= q60 {
            0
        } else if m.monetary <= q80 {
            1
        } else {
            2
        };
        counts[idx] += 1;
    }

    vec![
        SegmentCount {
            segment: ValueSegment::Low,
            count: counts[0],
        },
        SegmentCount {
            segment: ValueSegment::Medium,
            count: counts[1],
        },
        SegmentCount {
            segment: ValueSegment::High,
            count: counts[2],
        },
    ]
}

/// Quantile with linear interpolation over a sorted slice (the pandas
/// default).  Returns NaN for an empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::OrderRecord;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(
        order: &str,
        customer: &str,
        state: &str,
        date: NaiveDate,
        cat: &str,
        price: f64,
    ) -> OrderRecord {
        OrderRecord {
            order_id: order.into(),
            customer_id: customer.into(),
            customer_state: state.into(),
            purchase_date: date,
            category: cat.into(),
            price,
        }
    }

    fn dataset() -> OrderDataset {
        OrderDataset::from_orders(vec![
            rec("o1", "c1", "SP", d(2017, 1, 10), "books", 10.0),
            rec("o2", "c1", "SP", d(2017, 1, 20), "toys", 15.0),
            rec("o3", "c2", "RJ", d(2017, 2, 5), "toys", 40.0),
            rec("o3", "c2", "RJ", d(2017, 2, 5), "toys", 5.0),
            rec("o4", "c3", "MG", d(2017, 3, 1), "books", 30.0),
        ])
        .unwrap()
    }

    fn all_indices(ds: &OrderDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn monthly_trend_is_sorted_and_sums_match() {
        let ds = dataset();
        let trend = monthly_sales_trend(&ds, &all_indices(&ds));

        assert_eq!(trend.len(), 3);
        assert!(trend.windows(2).all(|w| w[0].month < w[1].month));
        assert_eq!(trend[0].month, d(2017, 1, 1));
        assert!((trend[0].total - 25.0).abs() < 1e-9);
        assert!((trend[1].total - 45.0).abs() < 1e-9);

        let grand: f64 = trend.iter().map(|m| m.total).sum();
        let expected: f64 = ds.orders.iter().map(|o| o.price).sum();
        assert!((grand - expected).abs() < 1e-9);
    }

    #[test]
    fn monthly_trend_of_empty_selection_is_empty() {
        let ds = dataset();
        assert!(monthly_sales_trend(&ds, &[]).is_empty());
    }

    #[test]
    fn top_categories_ranked_and_capped() {
        let ds = dataset();
        let top = top_categories_by_count(&ds, &all_indices(&ds), 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category, "toys");
        assert_eq!(top[0].count, 3);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));

        let capped = top_categories_by_count(&ds, &all_indices(&ds), 1);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].category, "toys");
    }

    #[test]
    fn state_sales_one_row_per_state_descending() {
        let ds = dataset();
        let ranked = sales_by_state(&ds, &all_indices(&ds));

        assert_eq!(ranked.len(), 3);
        let states: BTreeSet<&str> = ranked.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(states.len(), ranked.len());
        assert!(ranked.windows(2).all(|w| w[0].total >= w[1].total));
        assert_eq!(ranked[0].state, "RJ");
        assert!((ranked[0].total - 45.0).abs() < 1e-9);
    }

    #[test]
    fn rfm_counts_distinct_orders() {
        let ds = dataset();
        let metrics = customer_rfm(&ds, &all_indices(&ds));
        assert_eq!(metrics.len(), 3);

        // c2 has two lines but a single order.
        let c2 = metrics.iter().find(|m| m.customer_id == "c2").unwrap();
        assert_eq!(c2.frequency, 1);
        assert!((c2.monetary - 45.0).abs() < 1e-9);

        let c1 = metrics.iter().find(|m| m.customer_id == "c1").unwrap();
        assert_eq!(c1.frequency, 2);
        assert!((c1.monetary - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rfm_recency_is_relative_to_selection_latest() {
        let ds = dataset();
        let metrics = customer_rfm(&ds, &all_indices(&ds));

        let c3 = metrics.iter().find(|m| m.customer_id == "c3").unwrap();
        assert_eq!(c3.recency_days, 0);

        let c1 = metrics.iter().find(|m| m.customer_id == "c1").unwrap();
        // 2017-01-20 → 2017-03-01
        assert_eq!(c1.recency_days, 40);
    }

    #[test]
    fn rfm_of_empty_selection_is_empty() {
        let ds = dataset();
        assert!(customer_rfm(&ds, &[]).is_empty());
    }

    #[test]
    fn rankings_sort_the_right_way() {
        let ds = dataset();
        let metrics = customer_rfm(&ds, &all_indices(&ds));

        let by_recency = top_by_recency(&metrics, 2);
        assert_eq!(by_recency[0].customer_id, "c3");

        let by_frequency = top_by_frequency(&metrics, 5);
        assert_eq!(by_frequency[0].customer_id, "c1");

        let by_monetary = top_by_monetary(&metrics, 1);
        assert_eq!(by_monetary.len(), 1);
        assert_eq!(by_monetary[0].customer_id, "c2");
    }

    #[test]
    fn value_segments_cover_all_customers() {
        let metrics: Vec<CustomerRfm> = (0..10)
            .map(|i| CustomerRfm {
                customer_id: format!("c{i}"),
                recency_days: 0,
                frequency: 1,
                monetary: (i + 1) as f64 * 10.0,
                last_purchase: d(2017, 1, 1),
            })
            .collect();

        let segments = value_segments(&metrics);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].segment, ValueSegment::Low);
        let total: usize = segments.iter().map(|s| s.count).sum();
        assert_eq!(total, metrics.len());

        // With values 10..100 the 0.6 quantile is 64 and the 0.8 is 82:
        // 6 low (≤64), 2 medium (70, 80), 2 high (90, 100).
        assert_eq!(segments[0].count, 6);
        assert_eq!(segments[1].count, 2);
        assert_eq!(segments[2].count, 2);
    }

    #[test]
    fn quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-9);
        assert!((quantile(&sorted, 0.0) - 1.0).abs() < 1e-9);
        assert!((quantile(&sorted, 1.0) - 4.0).abs() < 1e-9);
    }
}
