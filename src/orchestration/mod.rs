pub mod report;

pub use report::{Report, ReportService};
