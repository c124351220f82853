pub(crate) mod handlers;
pub mod models;
mod service;

pub use handlers::list_categories;
pub use service::CategoryService;
