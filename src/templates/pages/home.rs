use crate::db::DatasetInfo;
use crate::normalizer::REQUIRED_COLUMNS;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn home_page(current: Option<&DatasetInfo>) -> Markup {
    desktop_layout(
        "Upload",
        html! {
            main class="container" {
                h1 { "Hotel Match Finder" }
                p { "Upload a property workbook, pick base hotels, and export a comparables report." }

                section class="card" {
                    h3 { "Upload workbook" }
                    form action="/upload" method="post" enctype="multipart/form-data" {
                        input type="file" name="workbook" accept=".xlsx" required;
                        button type="submit" { "Upload" }
                    }
                    p class="hint" {
                        "The first worksheet is read. Uploading replaces the current dataset."
                    }
                }

                @if let Some(info) = current {
                    section class="card" {
                        h3 { "Current dataset" }
                        p { strong { (info.filename) } " with " (info.kept) " properties" }
                        p class="hint" {
                            "Uploaded " (info.uploaded_at.format("%Y-%m-%d %H:%M")) " UTC"
                        }
                        p { a href="/dataset" { "Go to selection" } }
                    }
                }

                section class="card" {
                    h3 { "Required columns" }
                    ul {
                        @for col in REQUIRED_COLUMNS {
                            li { (col) }
                        }
                    }
                }
            }
        },
    )
}
