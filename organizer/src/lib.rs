pub mod categories;
pub mod report;

pub use categories::CategoryMap;
pub use report::{ReportWriter, UNCATEGORIZED_FILE};
