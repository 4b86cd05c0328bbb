pub mod config;
pub mod load;
pub mod render;
pub mod report;
pub mod table;

pub use config::ReportConfig;
pub use report::{run, ReportSummary};
pub use table::{Cell, CombinedTable, Row, COLUMNS};
