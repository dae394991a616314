pub mod error;

pub use error::{error_page, html_error_response};
