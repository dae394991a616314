// src/tests/router_tests/upload_flow_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, hotel_workbook, make_db, multipart_file, post};

#[test]
fn upload_then_dataset_page_lists_properties() {
    let db = make_db("upload_flow");
    let workbook = hotel_workbook(&[
        ("100 Main St", 150.0, 1_000_000.0, 5000.0, "Upscale"),
        ("200 Oak Ave", 100.0, 950_000.0, 4800.0, "Upscale"),
    ]);
    let (content_type, body) = multipart_file("hotels.xlsx", &workbook);

    let resp = handle(post("/upload", &content_type, body), &db).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/dataset");

    let mut resp = handle(get("/dataset"), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let html = body_string(&mut resp);
    assert!(html.contains("100 Main St"));
    assert!(html.contains("200 Oak Ave"));
    assert!(html.contains("hotels.xlsx"));
}

#[test]
fn second_upload_replaces_the_first_dataset() {
    let db = make_db("replace");

    let first = hotel_workbook(&[("1 First St", 100.0, 500_000.0, 5000.0, "Economy")]);
    let (ct, body) = multipart_file("first.xlsx", &first);
    handle(post("/upload", &ct, body), &db).unwrap();

    let second = hotel_workbook(&[("2 Second St", 80.0, 400_000.0, 5000.0, "Economy")]);
    let (ct, body) = multipart_file("second.xlsx", &second);
    handle(post("/upload", &ct, body), &db).unwrap();

    let mut resp = handle(get("/dataset"), &db).unwrap();
    let html = body_string(&mut resp);
    assert!(html.contains("2 Second St"));
    assert!(!html.contains("1 First St"));
    assert!(html.contains("second.xlsx"));
}

#[test]
fn non_xlsx_upload_is_rejected() {
    let db = make_db("bad_ext");
    let (content_type, body) = multipart_file("hotels.csv", b"Address,Rooms\n");

    match handle(post("/upload", &content_type, body), &db) {
        Err(ServerError::UploadError(msg)) => assert!(msg.contains("hotels.csv")),
        other => panic!("expected UploadError, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn upload_without_multipart_content_type_is_rejected() {
    let db = make_db("bad_ct");

    match handle(
        post("/upload", "application/x-www-form-urlencoded", Vec::new()),
        &db,
    ) {
        Err(ServerError::UploadError(_)) => {}
        other => panic!("expected UploadError, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn workbook_missing_a_required_column_is_a_bad_request() {
    let db = make_db("missing_col");

    // Valid xlsx bytes, wrong sheet shape.
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Some Column").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();
    let (content_type, body) = multipart_file("odd.xlsx", &bytes);

    match handle(post("/upload", &content_type, body), &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("required column")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn dataset_page_redirects_home_when_nothing_is_loaded() {
    let db = make_db("no_dataset");

    let resp = handle(get("/dataset"), &db).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");
}

#[test]
fn home_page_mentions_the_loaded_dataset() {
    let db = make_db("home");

    let mut resp = handle(get("/"), &db).unwrap();
    let html = body_string(&mut resp);
    assert!(html.contains("Upload workbook"));
    assert!(!html.contains("Current dataset"));

    let workbook = hotel_workbook(&[("9 Elm St", 60.0, 300_000.0, 5000.0, "Midscale")]);
    let (ct, body) = multipart_file("elm.xlsx", &workbook);
    handle(post("/upload", &ct, body), &db).unwrap();

    let mut resp = handle(get("/"), &db).unwrap();
    let html = body_string(&mut resp);
    assert!(html.contains("Current dataset"));
    assert!(html.contains("elm.xlsx"));
}

#[test]
fn unknown_route_is_not_found() {
    let db = make_db("not_found");

    match handle(get("/nope"), &db) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {:?}", other.map(|r| r.status())),
    }
}
