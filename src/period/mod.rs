mod models;
mod resolver;

pub use models::{DateInterval, PeriodError, PeriodQuery, PeriodSelector};
pub use resolver::parse_wall_clock;
