pub mod html;
pub mod xlsx;

pub use html::{html_response, redirect_response};
pub use xlsx::xlsx_response;

// Route handlers return this alias everywhere.
pub use crate::errors::ResultResp;
