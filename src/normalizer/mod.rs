// src/normalizer/mod.rs

use crate::domain::class::HotelClass;
use crate::domain::record::{PropertyRecord, RecordId};
use calamine::{Data, Reader, Xlsx};
use std::fmt;
use std::io::Cursor;

/// Header labels the uploaded sheet must carry, matched exactly after
/// trimming.
pub const REQUIRED_COLUMNS: [&str; 10] = [
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

#[derive(Debug)]
pub enum NormalizeError {
    Workbook(String),
    EmptySheet,
    MissingColumn(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Workbook(msg) => write!(f, "could not read workbook: {msg}"),
            NormalizeError::EmptySheet => write!(f, "the workbook has no data rows"),
            NormalizeError::MissingColumn(name) => {
                write!(f, "required column '{name}' is missing")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// What the normalizer kept and dropped; shown to the analyst after an
/// upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    pub kept: usize,
    pub dropped_numeric: usize,
    pub dropped_class: usize,
}

struct Columns {
    address: usize,
    project: usize,
    state: usize,
    county: usize,
    rooms: usize,
    market_value: usize,
    vpr: usize,
    class: usize,
    owner_street: usize,
    owner_name: usize,
    /// (column index, header) pairs for everything else, kept verbatim.
    extra: Vec<(usize, String)>,
}

fn locate_columns(headers: &[String]) -> Result<Columns, NormalizeError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NormalizeError::MissingColumn(name.to_string()))
    };

    let mut cols = Columns {
        address: find("Property Address")?,
        project: find("Project / Hotel Name")?,
        state: find("State")?,
        county: find("Property County")?,
        rooms: find("No. of Rooms")?,
        market_value: find("Market Value-2024")?,
        vpr: find("2024 VPR")?,
        class: find("Hotel Class")?,
        owner_street: find("Owner Street Address")?,
        owner_name: find("Owner Name/LLC Name")?,
        extra: Vec::new(),
    };

    let required = [
        cols.address,
        cols.project,
        cols.state,
        cols.county,
        cols.rooms,
        cols.market_value,
        cols.vpr,
        cols.class,
        cols.owner_street,
        cols.owner_name,
    ];
    cols.extra = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| !required.contains(i) && !h.is_empty())
        .map(|(i, h)| (i, h.clone()))
        .collect();

    Ok(cols)
}

/// Parses an uploaded workbook (first worksheet) into the working
/// dataset.
///
/// Loading rules mirror the source spreadsheets: headers are trimmed,
/// the numeric columns are coerced (dollar signs and thousands commas
/// stripped), and rows that fail coercion or carry an unknown hotel
/// class are dropped and counted rather than failing the upload.
/// Record ids are assigned from the surviving row order, which is what
/// all downstream identity comparisons use.
pub fn normalize_xlsx(
    bytes: &[u8],
) -> Result<(Vec<PropertyRecord>, NormalizeReport), NormalizeError> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| NormalizeError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(NormalizeError::EmptySheet)?
        .map_err(|e| NormalizeError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(NormalizeError::EmptySheet)?
        .iter()
        .map(cell_text)
        .collect();
    let cols = locate_columns(&headers)?;

    let mut records = Vec::new();
    let mut report = NormalizeReport {
        kept: 0,
        dropped_numeric: 0,
        dropped_class: 0,
    };

    for row in rows {
        let Some(room_count) = number_at(row, cols.rooms).filter(|v| *v > 0.0) else {
            report.dropped_numeric += 1;
            continue;
        };
        let Some(market_value) = number_at(row, cols.market_value).filter(|v| *v >= 0.0) else {
            report.dropped_numeric += 1;
            continue;
        };
        let Some(value_per_room) = number_at(row, cols.vpr).filter(|v| *v >= 0.0) else {
            report.dropped_numeric += 1;
            continue;
        };

        let class_label = text_at(row, cols.class);
        let Some(hotel_class) = HotelClass::from_label(&class_label) else {
            report.dropped_class += 1;
            continue;
        };

        let extra = cols
            .extra
            .iter()
            .map(|(i, name)| (name.clone(), text_at(row, *i)))
            .collect();

        records.push(PropertyRecord {
            id: RecordId(records.len()),
            address: text_at(row, cols.address),
            project_name: text_at(row, cols.project),
            state: text_at(row, cols.state),
            county: text_at(row, cols.county),
            room_count,
            market_value,
            value_per_room,
            hotel_class,
            class_order: hotel_class.order(),
            owner_street: text_at(row, cols.owner_street),
            owner_name: text_at(row, cols.owner_name),
            extra,
        });
    }

    report.kept = records.len();
    Ok((records, report))
}

fn text_at(row: &[Data], col: usize) -> String {
    row.get(col).map(cell_text).unwrap_or_default()
}

fn number_at(row: &[Data], col: usize) -> Option<f64> {
    row.get(col).and_then(cell_number).filter(|v| v.is_finite())
}

/// Cell rendered as trimmed text. Whole floats print without the
/// trailing ".0" so counts survive a text round trip.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        Data::Int(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => {
            let cleaned = s.trim().replace('$', "").replace(',', "");
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        _ => None,
    }
}
