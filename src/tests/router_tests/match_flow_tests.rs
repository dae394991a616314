// src/tests/router_tests/match_flow_tests.rs

use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_bytes, body_string, hotel_workbook, make_db, multipart_file, post,
};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

const FORM_CT: &str = "application/x-www-form-urlencoded";

/// Harris county pool: row 0 is the base, rows 1-3 are in-band smaller
/// candidates at increasing distance, row 4 is out of band.
fn load_harris_pool(db: &Database) {
    let workbook = hotel_workbook(&[
        ("0 Base Blvd", 150.0, 1_000_000.0, 5000.0, "Upscale"),
        ("1 Near St", 120.0, 1_001_000.0, 5010.0, "Upscale"),
        ("2 Mid St", 110.0, 1_050_000.0, 5200.0, "Upper Upscale"),
        ("3 Far St", 100.0, 1_150_000.0, 5700.0, "Upper Midscale"),
        ("4 Out St", 90.0, 2_000_000.0, 9000.0, "Upscale"),
    ]);
    let (ct, body) = multipart_file("harris.xlsx", &workbook);
    handle(post("/upload", &ct, body), db).unwrap();
}

fn run_form(base_ids: &[usize]) -> Vec<u8> {
    let mut form = String::new();
    for id in base_ids {
        form.push_str(&format!("base={id}&"));
    }
    form.push_str("mv_min=80&mv_max=120&vpr_min=80&vpr_max=120&capacity=5");
    form.into_bytes()
}

#[test]
fn run_lists_candidates_in_distance_order() {
    let db = make_db("run_order");
    load_harris_pool(&db);

    let mut resp = handle(post("/run", FORM_CT, run_form(&[0])), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let html = body_string(&mut resp);

    assert!(html.contains("Matched"));
    assert!(html.contains("Nearest 1"));
    let near = html.find("1 Near St").unwrap();
    let mid = html.find("2 Mid St").unwrap();
    let far = html.find("3 Far St").unwrap();
    assert!(near < mid && mid < far, "results out of distance order");
    assert!(!html.contains("4 Out St"), "out-of-band candidate leaked in");
}

#[test]
fn run_reports_no_match_when_bands_exclude_everyone() {
    let db = make_db("run_no_match");
    load_harris_pool(&db);

    // 99..101% bands around the base leave nothing eligible.
    let form = b"base=0&mv_min=99.9&mv_max=100.1&vpr_min=99.9&vpr_max=100.1&capacity=5".to_vec();
    let mut resp = handle(post("/run", FORM_CT, form), &db).unwrap();
    let html = body_string(&mut resp);

    assert!(html.contains("No Match"));
    assert!(html.contains("0 eligible"));
}

#[test]
fn run_produces_one_group_per_selected_base() {
    let db = make_db("run_multi");
    load_harris_pool(&db);

    let mut resp = handle(post("/run", FORM_CT, run_form(&[0, 4])), &db).unwrap();
    let html = body_string(&mut resp);

    // Both bases render as group headings.
    assert!(html.contains("0 Base Blvd Hotel"));
    assert!(html.contains("4 Out St Hotel"));
}

#[test]
fn run_without_a_selection_is_a_bad_request() {
    let db = make_db("run_empty");
    load_harris_pool(&db);

    let form = b"mv_min=80&mv_max=120&vpr_min=80&vpr_max=120&capacity=5".to_vec();
    match handle(post("/run", FORM_CT, form), &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("at least one")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn run_with_an_inverted_band_is_rejected_up_front() {
    let db = make_db("run_inverted");
    load_harris_pool(&db);

    let form = b"base=0&mv_min=120&mv_max=80&vpr_min=80&vpr_max=120&capacity=5".to_vec();
    match handle(post("/run", FORM_CT, form), &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("market value")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn run_with_a_stale_record_id_is_a_bad_request() {
    let db = make_db("run_stale");
    load_harris_pool(&db);

    match handle(post("/run", FORM_CT, run_form(&[42])), &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("unknown record id")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn export_downloads_a_report_workbook() {
    let db = make_db("export");
    load_harris_pool(&db);

    let mut resp = handle(post("/export", FORM_CT, run_form(&[0])), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("comparables_harris.xlsx"));

    // The download parses back as a workbook with the report shape.
    let bytes = body_bytes(&mut resp);
    let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();

    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("Property Address".to_string()))
    );
    assert_eq!(
        range.get_value((1, 0)),
        Some(&Data::String("0 Base Blvd".to_string()))
    );
    assert_eq!(
        range.get_value((1, 11)),
        Some(&Data::String("Matched".to_string()))
    );
}

#[test]
fn run_before_any_upload_is_a_bad_request() {
    let db = make_db("run_no_data");

    match handle(post("/run", FORM_CT, run_form(&[0])), &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("upload a dataset")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}
