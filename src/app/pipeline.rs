//! Shared pipeline used by both the report and the dashboard.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> filter -> aggregate
//!
//! The front-ends can then focus on presentation (printing vs widgets) and
//! never touch raw or normalized tables directly.

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::cache::DatasetCache;
use crate::domain::{Analysis, CategoryFilter, ColumnNames, Dataset};
use crate::error::AppError;
use crate::io::ingest::{LoadOptions, load_raw_table};
use crate::prep::{apply_filter, filter_choices, normalize};
use crate::report::analyze;

/// Where the dataset comes from and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub options: LoadOptions,
    pub columns: ColumnNames,
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: LoadOptions::default(),
            columns: ColumnNames::default(),
        }
    }
}

/// Everything a front-end needs for one selection.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Arc<Dataset>,
    /// Selector values: `All` followed by every observed category.
    pub choices: Vec<CategoryFilter>,
    pub analysis: Analysis,
}

/// Loader + normalizer, uncached.
pub fn load_dataset(source: &SourceConfig) -> Result<Dataset, AppError> {
    let raw = load_raw_table(&source.path, &source.options)?;
    normalize(&raw, &source.columns)
}

/// Filter + aggregate. Pure: same dataset and filter, same output.
pub fn analyze_dataset(dataset: &Dataset, filter: &CategoryFilter) -> Analysis {
    analyze(&apply_filter(dataset, filter))
}

/// Execute the full pipeline, reusing a cached dataset when available.
pub fn run(cache: &mut DatasetCache, source: &SourceConfig, filter: &CategoryFilter) -> Result<RunOutput, AppError> {
    let dataset = cache.get_or_load(source)?;
    Ok(rerun(dataset, filter))
}

/// Recompute the analysis for a new selection on an already-loaded dataset.
pub fn rerun(dataset: Arc<Dataset>, filter: &CategoryFilter) -> RunOutput {
    let analysis = analyze_dataset(&dataset, filter);
    let choices = filter_choices(&dataset);
    RunOutput {
        dataset,
        choices,
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Row ID,Order ID,Order Date,Ship Date,Ship Mode,Category,Sales,Profit
1,CA-1,11/8/2016,11/11/2016,Second Class,Furniture,261.96,41.9136
2,CA-1,11/8/2016,11/11/2016,Second Class,Furniture,731.94,219.582
3,CA-2,6/12/2016,6/16/2016,Second Class,Office Supplies,14.62,6.8714
4,US-3,10/11/2015,10/18/2015,Standard Class,Furniture,957.5775,-383.031
4,US-3,10/11/2015,10/18/2015,Standard Class,Furniture,957.5775,-383.031
";

    fn source(dir: &tempfile::TempDir) -> SourceConfig {
        let path = dir.path().join("superstore.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        SourceConfig::new(path)
    }

    #[test]
    fn end_to_end_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DatasetCache::new();
        let out = run(&mut cache, &source(&dir), &CategoryFilter::All).unwrap();

        assert_eq!(out.dataset.len(), 4);
        assert_eq!(out.analysis.metrics.total_orders, 3);
        assert_eq!(
            out.choices,
            vec![
                CategoryFilter::All,
                CategoryFilter::Category("Furniture".to_string()),
                CategoryFilter::Category("Office Supplies".to_string()),
            ]
        );
        let years: Vec<(i32, u32)> = out
            .analysis
            .monthly_sales
            .iter()
            .map(|m| (m.year, m.month))
            .collect();
        assert_eq!(years, vec![(2015, 10), (2016, 6), (2016, 11)]);
        assert_eq!(out.analysis.category_profit[0].category, "Office Supplies");
    }

    #[test]
    fn cached_and_uncached_runs_agree() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(&dir);
        let filter = CategoryFilter::Category("Furniture".to_string());

        let mut cache = DatasetCache::new();
        let cached = run(&mut cache, &source, &filter).unwrap();
        let again = run(&mut cache, &source, &filter).unwrap();
        let uncached = analyze_dataset(&load_dataset(&source).unwrap(), &filter);

        assert_eq!(cached.analysis, uncached);
        assert_eq!(again.analysis, uncached);
        assert!(Arc::ptr_eq(&cached.dataset, &again.dataset));
    }

    #[test]
    fn errors_propagate_without_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "Order ID,Order Date,Ship Date,Category,Sales,Profit\nA,yesterday,2020-01-01,Tech,1,1\n",
        )
        .unwrap();

        let mut cache = DatasetCache::new();
        let err = run(&mut cache, &SourceConfig::new(path), &CategoryFilter::All).unwrap_err();
        assert!(matches!(err, AppError::DateParse(_)));
        assert!(cache.is_empty());
    }
}
