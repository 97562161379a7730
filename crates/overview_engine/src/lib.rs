//! Derived-state pipeline behind the financial overview.
//!
//! Raw expense/earning records are normalized once at a single seam, then
//! every view model (category charts, monthly buckets, runway, drill-down
//! tables) is recomputed from scratch on each filter change. All functions
//! here are pure; nothing writes back to the record source.

pub mod aggregate;
pub mod debounce;
pub mod drilldown;
pub mod filter;
pub mod normalize;
pub mod overview;
pub mod runway;

pub use aggregate::{aggregate_by_category, aggregate_by_month, month_labels, to_chart_view_model};
pub use debounce::FilterEditor;
pub use drilldown::category_details;
pub use filter::{filter_by_months, filter_records};
pub use normalize::{normalize_record, normalize_records};
pub use overview::{compute_overview, OverviewRequest};
pub use runway::project_runway;
