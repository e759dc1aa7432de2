//! Data preparation: raw table → normalized dataset → working subset.
//!
//! - parsing, deduplication, derived calendar fields (`normalize`)
//! - the optional category filter (`filter`)

pub mod filter;
pub mod normalize;

pub use filter::*;
pub use normalize::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{ColumnNames, Dataset};
    use crate::io::ingest::{TextEncoding, parse_raw_table};

    pub const HEADER: &str = "Row ID,Order ID,Order Date,Ship Date,Category,Sales,Profit";

    /// Two line items of order A1 plus one Office order.
    pub const SCENARIO: &str = "\
Row ID,Order ID,Order Date,Ship Date,Category,Sales,Profit
1,A1,2023-01-05,2023-01-08,Tech,100,20
2,A1,2023-01-05,2023-01-08,Tech,50,10
3,A2,2023-02-10,2023-02-12,Office,30,-5
";

    pub fn dataset(csv: &str) -> Dataset {
        let raw = parse_raw_table(csv, b',', TextEncoding::Utf8).unwrap();
        super::normalize(&raw, &ColumnNames::default()).unwrap()
    }
}
