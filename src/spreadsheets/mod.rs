pub mod export_xlsx;

pub use export_xlsx::{build_report_workbook, export_results_xlsx};
