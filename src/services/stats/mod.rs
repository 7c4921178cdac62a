pub mod dashboard;
pub mod describe;
pub mod detect;
pub mod distribution;
pub mod histogram;
pub mod timeseries;
pub mod types;

pub use dashboard::analyze_for_dashboard;
pub use describe::{column_statistics, percentile};
pub use detect::{detect_date_columns, detect_numeric_columns, parse_date};
pub use distribution::{default_currency_ranges, distribution, pareto, range_distribution, top_items};
pub use histogram::{histogram, quartiles};
pub use timeseries::aggregate_by_time;
pub use types::{CellValue, DashboardAnalysis, Granularity, Row};
