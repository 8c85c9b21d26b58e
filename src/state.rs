use crate::data::filter::{DateFilter, filtered_indices};
use crate::data::model::OrderDataset;

// ---------------------------------------------------------------------------
// Dashboard sections
// ---------------------------------------------------------------------------

/// The four analysis sections selectable in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    SalesAnalysis,
    ProductInsights,
    GeographicAnalysis,
    CustomerSegmentation,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::SalesAnalysis,
        Section::ProductInsights,
        Section::GeographicAnalysis,
        Section::CustomerSegmentation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::SalesAnalysis => "Sales Analysis",
            Section::ProductInsights => "Product Insights",
            Section::GeographicAnalysis => "Geographic Analysis",
            Section::CustomerSegmentation => "Customer Segmentation",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<OrderDataset>,

    /// Current date-range selection.
    pub date_filter: Option<DateFilter>,

    /// Indices of order lines inside the current date range (cached).
    pub visible_indices: Vec<usize>,

    /// Active analysis section.
    pub section: Section,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            date_filter: None,
            visible_indices: Vec::new(),
            section: Section::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filter to its full range.
    pub fn set_dataset(&mut self, dataset: OrderDataset) {
        self.date_filter = Some(DateFilter::full_range(&dataset));
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` after a date-filter change.
    pub fn refilter(&mut self) {
        if let (Some(ds), Some(filter)) = (&self.dataset, &self.date_filter) {
            self.visible_indices = filtered_indices(ds, filter);
        }
    }

    /// Replace the date filter (clamped to the dataset range) and refilter.
    pub fn set_date_filter(&mut self, filter: DateFilter) {
        if let Some(ds) = &self.dataset {
            let (min, max) = ds.date_range();
            let filter = filter.normalised();
            self.date_filter = Some(DateFilter {
                start: filter.start.clamp(min, max),
                end: filter.end.clamp(min, max),
            });
            self.refilter();
        }
    }

    /// Reset the date filter to the dataset's full range.
    pub fn reset_date_range(&mut self) {
        if let Some(ds) = &self.dataset {
            self.date_filter = Some(DateFilter::full_range(ds));
            self.refilter();
        }
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::OrderRecord;
    use chrono::NaiveDate;

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
            mk("b", d(2017, 7, 1)),
            mk("c", d(2018, 1, 1)),
        ])
        .unwrap()
    }

    #[test]
    fn set_dataset_selects_full_range() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.visible_indices.len(), 3);
        let filter = state.date_filter.unwrap();
        assert_eq!(filter.start, d(2017, 1, 1));
        assert_eq!(filter.end, d(2018, 1, 1));
    }

    #[test]
    fn set_date_filter_clamps_to_dataset_range() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_date_filter(DateFilter {
            start: d(2016, 1, 1),
            end: d(2017, 12, 31),
        });
        let filter = state.date_filter.unwrap();
        assert_eq!(filter.start, d(2017, 1, 1));
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn reset_restores_full_range() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_date_filter(DateFilter {
            start: d(2017, 6, 1),
            end: d(2017, 8, 1),
        });
        assert_eq!(state.visible_indices, vec![1]);
        state.reset_date_range();
        assert_eq!(state.visible_indices.len(), 3);
    }
}
