use crate::db::connection::{init_db, Database};
use astra::Body;
use http::Method;
use rust_xlsxwriter::Workbook;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

pub const BOUNDARY: &str = "----routertestboundary";

/// Fresh test database on the production schema, under a unique temp
/// path per call.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "hotel_comps_{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path);
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

pub fn get(path: &str) -> astra::Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn post(path: &str, content_type: &str, body: Vec<u8>) -> astra::Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap()
}

/// Wraps workbook bytes as the single-file multipart body our upload
/// form produces. Returns (content type, body).
pub fn multipart_file(filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"workbook\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (content_type, body)
}

/// Builds an uploadable workbook from (address, rooms, market value,
/// VPR, class) rows. Location is fixed to Harris county, TX; each row
/// gets its own owner so nothing collapses as a duplicate.
pub fn hotel_workbook(rows: &[(&str, f64, f64, f64, &str)]) -> Vec<u8> {
    let headers = [
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

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (c, header) in headers.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header).unwrap();
    }
    for (i, (address, rooms, mv, vpr, class)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, *address).unwrap();
        worksheet
            .write_string(r, 1, format!("{address} Hotel"))
            .unwrap();
        worksheet.write_string(r, 2, "TX").unwrap();
        worksheet.write_string(r, 3, "Harris").unwrap();
        worksheet.write_number(r, 4, *rooms).unwrap();
        worksheet.write_number(r, 5, *mv).unwrap();
        worksheet.write_number(r, 6, *vpr).unwrap();
        worksheet.write_string(r, 7, *class).unwrap();
        worksheet
            .write_string(r, 8, format!("{address} Owner St"))
            .unwrap();
        worksheet
            .write_string(r, 9, format!("{address} LLC"))
            .unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

pub fn body_bytes(resp: &mut astra::Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn body_string(resp: &mut astra::Response) -> String {
    String::from_utf8_lossy(&body_bytes(resp)).into_owned()
}
