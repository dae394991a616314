use crate::domain::runner::ResultGroup;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Workbook, Worksheet};

const BASE_HEADERS: [&str; 10] = [
    "Property Address",
    "Project / Hotel Name",
    "State",
    "Property County",
    "No. of Rooms",
    "Market Value-2024",
    "2024 VPR",
    "Hotel Class",
    "Owner Street Address",
    "Owner Name/LLC Name",
];

const RESULT_FIELDS: [&str; 8] = [
    "Address",
    "Project",
    "No. of Rooms",
    "Market Value",
    "VPR",
    "Hotel Class",
    "Role",
    "Distance",
];

/// Builds the report workbook: one flat row per base record with its
/// own columns, the eligible count and status, then the comparables
/// laid out in `Result N - <field>` blocks. Slots past the last
/// comparable stay blank.
pub fn build_report_workbook(
    groups: &[ResultGroup],
    capacity: usize,
) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Passthrough columns come from the shared pool, so the first
    // group's base names them for every row.
    let extra_headers: Vec<String> = groups
        .first()
        .map(|g| g.base.extra.iter().map(|(name, _)| name.clone()).collect())
        .unwrap_or_default();

    let mut col: u16 = 0;
    for header in BASE_HEADERS {
        put_str(worksheet, 0, col, header)?;
        col += 1;
    }
    for header in &extra_headers {
        put_str(worksheet, 0, col, header)?;
        col += 1;
    }
    put_str(worksheet, 0, col, "Matching Results Count")?;
    col += 1;
    put_str(worksheet, 0, col, "Status")?;
    col += 1;
    for n in 1..=capacity {
        for field in RESULT_FIELDS {
            put_str(worksheet, 0, col, &format!("Result {n} - {field}"))?;
            col += 1;
        }
    }

    for (i, group) in groups.iter().enumerate() {
        let r = (i + 1) as u32;
        let base = &group.base;
        let mut col: u16 = 0;

        put_str(worksheet, r, col, &base.address)?;
        col += 1;
        put_str(worksheet, r, col, &base.project_name)?;
        col += 1;
        put_str(worksheet, r, col, &base.state)?;
        col += 1;
        put_str(worksheet, r, col, &base.county)?;
        col += 1;
        put_num(worksheet, r, col, base.room_count)?;
        col += 1;
        put_num(worksheet, r, col, base.market_value)?;
        col += 1;
        put_num(worksheet, r, col, base.value_per_room)?;
        col += 1;
        put_str(worksheet, r, col, base.hotel_class.as_str())?;
        col += 1;
        put_str(worksheet, r, col, &base.owner_street)?;
        col += 1;
        put_str(worksheet, r, col, &base.owner_name)?;
        col += 1;

        for name in &extra_headers {
            let value = base
                .extra
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or("");
            put_str(worksheet, r, col, value)?;
            col += 1;
        }

        put_num(worksheet, r, col, group.eligible_count as f64)?;
        col += 1;
        put_str(worksheet, r, col, &group.status.label())?;
        col += 1;

        for comp in group.comparables.iter().take(capacity) {
            let rec = &comp.record;
            put_str(worksheet, r, col, &rec.address)?;
            col += 1;
            put_str(worksheet, r, col, &rec.project_name)?;
            col += 1;
            put_num(worksheet, r, col, rec.room_count)?;
            col += 1;
            put_num(worksheet, r, col, rec.market_value)?;
            col += 1;
            put_num(worksheet, r, col, rec.value_per_room)?;
            col += 1;
            put_str(worksheet, r, col, rec.hotel_class.as_str())?;
            col += 1;
            put_str(worksheet, r, col, comp.role.as_str())?;
            col += 1;
            put_num(worksheet, r, col, comp.distance)?;
            col += 1;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

/// Builds the report and wraps it as a file download.
pub fn export_results_xlsx(
    groups: &[ResultGroup],
    capacity: usize,
    filename: &str,
) -> ResultResp {
    let buffer = build_report_workbook(groups, capacity)?;
    xlsx_response(buffer, filename)
}

fn put_str(ws: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), ServerError> {
    ws.write_string(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("write ({row},{col}): {e}")))?;
    Ok(())
}

fn put_num(ws: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), ServerError> {
    ws.write_number(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("write ({row},{col}): {e}")))?;
    Ok(())
}
