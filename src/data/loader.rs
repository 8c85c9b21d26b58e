use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{OrderDataset, OrderRecord};

/// Column names as exported by the upstream analysis notebook.
const COL_ORDER_ID: &str = "order_id";
const COL_CUSTOMER_ID: &str = "customer_unique_id";
const COL_STATE: &str = "customer_state";
const COL_DATE: &str = "order_purchase_date";
const COL_CATEGORY: &str = "product_category_name";
const COL_PRICE: &str = "price";

/// Schema-level load failures, wrapped into `anyhow` with file context.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("file contains no order rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an order dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the six order-line columns
/// * `.json` – records orientation: `[{ "order_id": ..., ... }, ...]`
pub fn load_file(path: &Path) -> Result<OrderDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse a purchase timestamp.  The pandas export writes either a bare date
/// or a full timestamp; only the day matters downstream.
fn parse_purchase_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("'{s}' is not a YYYY-MM-DD date"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv<R: Read>(input: R) -> Result<OrderDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SchemaError::MissingColumn(name).into())
    };
    let order_idx = col(COL_ORDER_ID)?;
    let customer_idx = col(COL_CUSTOMER_ID)?;
    let state_idx = col(COL_STATE)?;
    let date_idx = col(COL_DATE)?;
    let category_idx = col(COL_CATEGORY)?;
    let price_idx = col(COL_PRICE)?;

    let mut orders = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let purchase_date = parse_purchase_date(field(date_idx))
            .with_context(|| format!("CSV row {row_no}: '{COL_DATE}'"))?;
        let price: f64 = field(price_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: '{COL_PRICE}' is not a number"))?;

        orders.push(OrderRecord {
            order_id: field(order_idx).to_string(),
            customer_id: field(customer_idx).to_string(),
            customer_state: field(state_idx).to_string(),
            purchase_date,
            category: field(category_idx).to_string(),
            price,
        });
    }

    OrderDataset::from_orders(orders).ok_or_else(|| SchemaError::Empty.into())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "order_id": "e481f51cbdc54678b7cc49136f2d6af7",
///     "customer_unique_id": "7c396fd4830fd04220f754e42b4e5bff",
///     "customer_state": "SP",
///     "order_purchase_date": "2017-10-02",
///     "product_category_name": "cool_stuff",
///     "price": 29.99
///   },
///   ...
/// ]
/// ```
fn load_json(text: &str) -> Result<OrderDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut orders = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let str_field = |name: &'static str| -> String {
            obj.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim()
                .to_string()
        };

        let date_str = obj
            .get(COL_DATE)
            .and_then(|v| v.as_str())
            .ok_or(SchemaError::MissingColumn(COL_DATE))
            .with_context(|| format!("Row {i}"))?;
        let purchase_date =
            parse_purchase_date(date_str).with_context(|| format!("Row {i}: '{COL_DATE}'"))?;

        let price = obj
            .get(COL_PRICE)
            .and_then(|v| v.as_f64())
            .ok_or(SchemaError::MissingColumn(COL_PRICE))
            .with_context(|| format!("Row {i}"))?;

        orders.push(OrderRecord {
            order_id: str_field(COL_ORDER_ID),
            customer_id: str_field(COL_CUSTOMER_ID),
            customer_state: str_field(COL_STATE),
            purchase_date,
            category: str_field(COL_CATEGORY),
            price,
        });
    }

    OrderDataset::from_orders(orders).ok_or_else(|| SchemaError::Empty.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_SAMPLE: &str = "\
order_id,customer_unique_id,customer_state,order_purchase_date,product_category_name,price
o1,cust0001aaaa,SP,2017-10-02 10:56:33,cool_stuff,29.99
o2,cust0002bbbb,RJ,2017-11-15,bed_bath_table,89.90
o2,cust0002bbbb,RJ,2017-11-15,bed_bath_table,12.50
";

    #[test]
    fn csv_roundtrip() {
        let ds = load_csv(CSV_SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.orders[0].customer_state, "SP");
        assert_eq!(
            ds.orders[0].purchase_date,
            NaiveDate::from_ymd_opt(2017, 10, 2).unwrap()
        );
        assert_eq!(ds.states, vec!["RJ".to_string(), "SP".to_string()]);
    }

    #[test]
    fn csv_missing_column_is_schema_error() {
        let bad = "order_id,customer_state\no1,SP\n";
        let err = load_csv(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("customer_unique_id"));
    }

    #[test]
    fn csv_bad_price_names_the_row() {
        let bad = "\
order_id,customer_unique_id,customer_state,order_purchase_date,product_category_name,price
o1,c1,SP,2017-10-02,toys,not-a-number
";
        let err = load_csv(bad.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("row 0"));
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"order_id":"o1","customer_unique_id":"c1","customer_state":"SP",
             "order_purchase_date":"2018-01-05","product_category_name":"toys","price":10.0},
            {"order_id":"o2","customer_unique_id":"c2","customer_state":"MG",
             "order_purchase_date":"2018-02-01 08:00:00","product_category_name":"","price":4.5}
        ]"#;
        let ds = load_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.orders[1].customer_state, "MG");
        // Empty category stays out of the category index.
        assert_eq!(ds.categories, vec!["toys".to_string()]);
    }

    #[test]
    fn empty_file_is_rejected() {
        let empty = "order_id,customer_unique_id,customer_state,order_purchase_date,product_category_name,price\n";
        let err = load_csv(empty.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no order rows"));
    }
}
