use crate::errors::ServerError;
use crate::templates::desktop_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::{html, Markup};

fn status_for(err: &ServerError) -> u16 {
    match err {
        ServerError::NotFound => 404,
        ServerError::BadRequest(_) | ServerError::UploadError(_) => 400,
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => 500,
    }
}

pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        "Error",
        html! {
            main class="container" {
                section class="card" {
                    h1 { "Error " (status) }
                    p { (message) }
                    p { a href="/" { "Back to upload" } }
                }
            }
        },
    )
}

/// Convert a ServerError into a proper HTML response.
pub fn html_error_response(err: ServerError) -> Response {
    let status = status_for(&err);
    let markup = error_page(status, &err.to_string());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .unwrap()
}
