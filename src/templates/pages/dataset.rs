use crate::db::DatasetInfo;
use crate::domain::{MatchConfig, PropertyRecord};
use crate::templates::{desktop_layout, fmt_usd};
use maud::{html, Markup};

pub struct DatasetVm {
    pub info: DatasetInfo,
    pub records: Vec<PropertyRecord>,
    pub defaults: MatchConfig,
}

pub fn dataset_page(vm: &DatasetVm) -> Markup {
    let dropped = vm.info.dropped_numeric + vm.info.dropped_class;

    desktop_layout(
        "Dataset",
        html! {
            main class="container" {
                h1 { "Select base properties" }
                p {
                    strong { (vm.info.filename) }
                    " with " (vm.records.len()) " properties loaded"
                    @if dropped > 0 {
                        " (" (vm.info.dropped_numeric) " rows dropped for bad numbers, "
                        (vm.info.dropped_class) " for unknown hotel class)"
                    }
                }

                form action="/run" method="post" {
                    section class="card" {
                        h3 { "Match settings" }
                        div class="settings" {
                            label {
                                "Market value band (%)"
                                input type="number" name="mv_min" value=(vm.defaults.mv_band.min_pct) step="any" required;
                                input type="number" name="mv_max" value=(vm.defaults.mv_band.max_pct) step="any" required;
                            }
                            label {
                                "Value per room band (%)"
                                input type="number" name="vpr_min" value=(vm.defaults.vpr_band.min_pct) step="any" required;
                                input type="number" name="vpr_max" value=(vm.defaults.vpr_band.max_pct) step="any" required;
                            }
                            label {
                                "Max comparables"
                                input type="number" name="capacity" value=(vm.defaults.capacity) min="1" required;
                            }
                        }
                        button type="submit" { "Find Comparables" }
                        p class="hint" {
                            "Check the base properties below, then run. Comparables are drawn "
                            "from the same county, smaller room counts, and compatible classes."
                        }
                    }

                    section class="card" {
                        table {
                            thead {
                                tr {
                                    th {}
                                    th { "Address" }
                                    th { "Project" }
                                    th { "State" }
                                    th { "County" }
                                    th class="num" { "Rooms" }
                                    th class="num" { "Market Value" }
                                    th class="num" { "VPR" }
                                    th { "Class" }
                                }
                            }
                            tbody {
                                @for rec in &vm.records {
                                    tr {
                                        td { input type="checkbox" name="base" value=(rec.id.0); }
                                        td { (rec.address) }
                                        td { (rec.project_name) }
                                        td { (rec.state) }
                                        td { (rec.county) }
                                        td class="num" { (format!("{:.0}", rec.room_count)) }
                                        td class="num" { (fmt_usd(rec.market_value)) }
                                        td class="num" { (fmt_usd(rec.value_per_room)) }
                                        td { (rec.hotel_class) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
