use crate::domain::runner::{GroupStatus, ResultGroup};
use crate::domain::MatchConfig;
use crate::templates::{desktop_layout, fmt_usd};
use maud::{html, Markup};

pub struct ResultsVm {
    pub groups: Vec<ResultGroup>,
    pub cfg: MatchConfig,
    /// Echoed into the export form so the download recomputes the
    /// exact same run.
    pub base_ids: Vec<usize>,
}

pub fn results_page(vm: &ResultsVm) -> Markup {
    let matched = vm
        .groups
        .iter()
        .filter(|g| g.status == GroupStatus::Matched)
        .count();

    desktop_layout(
        "Results",
        html! {
            main class="container" {
                h1 { "Comparable results" }
                p { (matched) " of " (vm.groups.len()) " base properties matched." }

                section class="card" {
                    form action="/export" method="post" {
                        @for id in &vm.base_ids {
                            input type="hidden" name="base" value=(id);
                        }
                        input type="hidden" name="mv_min" value=(vm.cfg.mv_band.min_pct);
                        input type="hidden" name="mv_max" value=(vm.cfg.mv_band.max_pct);
                        input type="hidden" name="vpr_min" value=(vm.cfg.vpr_band.min_pct);
                        input type="hidden" name="vpr_max" value=(vm.cfg.vpr_band.max_pct);
                        input type="hidden" name="capacity" value=(vm.cfg.capacity);
                        button type="submit" { "Download Report" }
                    }
                }

                @for group in &vm.groups {
                    (group_card(group))
                }

                p { a href="/dataset" { "Back to selection" } }
            }
        },
    )
}

fn group_card(group: &ResultGroup) -> Markup {
    html! {
        section class="card" {
            h3 { (group.base.project_name) ", " (group.base.address) }
            p {
                (group.base.county) ", " (group.base.state)
                " / " (format!("{:.0}", group.base.room_count)) " rooms"
                " / " (fmt_usd(group.base.market_value))
                " / " (fmt_usd(group.base.value_per_room)) " per room"
                " / " (group.base.hotel_class)
            }
            p {
                span class=(status_class(&group.status)) { (group.status.label()) }
                " (" (group.eligible_count) " eligible before the cap)"
            }

            @if !group.comparables.is_empty() {
                table {
                    thead {
                        tr {
                            th { "#" }
                            th { "Role" }
                            th { "Address" }
                            th { "Project" }
                            th class="num" { "Rooms" }
                            th class="num" { "Market Value" }
                            th class="num" { "VPR" }
                            th { "Class" }
                            th class="num" { "Distance" }
                        }
                    }
                    tbody {
                        @for comp in &group.comparables {
                            tr {
                                td { (comp.rank) }
                                td { (comp.role.as_str()) }
                                td { (comp.record.address) }
                                td { (comp.record.project_name) }
                                td class="num" { (format!("{:.0}", comp.record.room_count)) }
                                td class="num" { (fmt_usd(comp.record.market_value)) }
                                td class="num" { (fmt_usd(comp.record.value_per_room)) }
                                td { (comp.record.hotel_class) }
                                td class="num" { (format!("{:.1}", comp.distance)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn status_class(status: &GroupStatus) -> &'static str {
    match status {
        GroupStatus::Matched => "status ok",
        GroupStatus::NoMatch => "status warn",
        GroupStatus::Failed(_) => "status err",
    }
}
