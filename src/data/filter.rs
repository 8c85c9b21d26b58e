use chrono::NaiveDate;

use super::model::OrderDataset;

// ---------------------------------------------------------------------------
// Date-range filter
// ---------------------------------------------------------------------------

/// Inclusive purchase-date range selected in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateFilter {
    /// Filter covering the dataset's full date range.
    pub fn full_range(dataset: &OrderDataset) -> Self {
        let (start, end) = dataset.date_range();
        DateFilter { start, end }
    }

    /// Whether a date falls inside the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// An inverted range selects nothing; normalise by swapping.
    pub fn normalised(self) -> Self {
        if self.start > self.end {
            DateFilter {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }
}

/// Return indices of order lines whose purchase date falls in the range.
///
/// Rows are sorted by date at load time, so the matching block is
/// contiguous; a linear scan is still plenty for a dashboard dataset.
pub fn filtered_indices(dataset: &OrderDataset, filter: &DateFilter) -> Vec<usize> {
    let filter = filter.normalised();
    dataset
        .orders
        .iter()
        .enumerate()
        .filter(|(_, o)| filter.contains(o.purchase_date))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::OrderRecord;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> OrderDataset {
        let mk = |id: &str, date: NaiveDate| OrderRecord {
            order_id: id.into(),
            customer_id: format!("cust-{id}"),
            customer_state: "SP".into(),
            purchase_date: date,
            category: "toys".into(),
            price: 1.0,
        };
        OrderDataset::from_orders(vec![
            mk("a", d(2017, 1, 1)),
            mk("b", d(2017, 6, 15)),
            mk("c", d(2017, 12, 31)),
            mk("d", d(2018, 2, 10)),
        ])
        .unwrap()
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let ds = dataset();
        let f = DateFilter {
            start: d(2017, 6, 15),
            end: d(2017, 12, 31),
        };
        assert_eq!(filtered_indices(&ds, &f), vec![1, 2]);
    }

    #[test]
    fn full_range_selects_everything() {
        let ds = dataset();
        let f = DateFilter::full_range(&ds);
        assert_eq!(filtered_indices(&ds, &f).len(), ds.len());
    }

    #[test]
    fn inverted_range_is_swapped() {
        let ds = dataset();
        let f = DateFilter {
            start: d(2018, 2, 10),
            end: d(2017, 12, 31),
        };
        assert_eq!(filtered_indices(&ds, &f), vec![2, 3]);
    }

    #[test]
    fn disjoint_range_selects_nothing() {
        let ds = dataset();
        let f = DateFilter {
            start: d(2020, 1, 1),
            end: d(2020, 12, 31),
        };
        assert!(filtered_indices(&ds, &f).is_empty());
    }
}
