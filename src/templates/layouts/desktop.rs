use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Hotel Comp Finder" }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="topbar" {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#524ed2"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M3 21l18 0" {}
                        path d="M5 21v-14l8 -4v18" {}
                        path d="M19 21v-10l-6 -4" {}
                        path d="M9 9l0 .01" {}
                        path d="M9 12l0 .01" {}
                        path d="M9 15l0 .01" {}
                        path d="M9 18l0 .01" {}
                    }
                    h3 { "Hotel Comp Finder" }
                    nav {
                        ul {
                            li { a href="/" { "Upload" } }
                            li { a href="/dataset" { "Dataset" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
