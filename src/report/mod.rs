mod aggregation;
pub(crate) mod handlers;
pub mod models;
mod service;

pub use aggregation::AggregationService;
pub use handlers::{
    get_balance, get_category_breakdown, get_expense, get_income, get_monthly_summary,
    get_outcome,
};
pub use service::ReportService;
