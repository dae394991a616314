use crate::db::connection::Database;
use crate::db::datasets;
use crate::domain::{FilterBand, MatchConfig, MatchRunner, PropertyRecord};
use crate::errors::ServerError;
use crate::normalizer;
use crate::responses::{html_response, redirect_response, ResultResp};
use crate::spreadsheets::export_results_xlsx;
use crate::templates;
use crate::templates::pages::{DatasetVm, ResultsVm};
use crate::upload;
use astra::{Body, Request, ResponseBuilder};
use std::io::Read;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(db),
        ("POST", "/upload") => upload_dataset(&mut req, db),
        ("GET", "/dataset") => dataset_page(db),
        ("POST", "/run") => run_matches(&mut req, db),
        ("POST", "/export") => export_report(&mut req, db),
        ("GET", "/static/main.css") => css_response(),
        _ => Err(ServerError::NotFound),
    }
}

fn home(db: &Database) -> ResultResp {
    let current = datasets::load_dataset(db)?.map(|(info, _)| info);
    html_response(templates::pages::home_page(current.as_ref()))
}

fn upload_dataset(req: &mut Request, db: &Database) -> ResultResp {
    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = read_body(req)?;

    let boundary = upload::multipart_boundary(&content_type).ok_or_else(|| {
        ServerError::UploadError("expected a multipart/form-data file upload".into())
    })?;
    let file = upload::extract_file(&body, &boundary)?;

    if !file.filename.to_ascii_lowercase().ends_with(".xlsx") {
        return Err(ServerError::UploadError(format!(
            "unsupported file type: {} (only .xlsx is accepted)",
            file.filename
        )));
    }

    let (records, report) = normalizer::normalize_xlsx(&file.data)
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;
    datasets::replace_dataset(db, &file.filename, &records, &report)?;

    println!(
        "Loaded dataset {} ({} rows kept, {} dropped)",
        file.filename,
        report.kept,
        report.dropped_numeric + report.dropped_class
    );

    redirect_response("/dataset")
}

fn dataset_page(db: &Database) -> ResultResp {
    let Some((info, records)) = datasets::load_dataset(db)? else {
        return redirect_response("/");
    };

    html_response(templates::pages::dataset_page(&DatasetVm {
        info,
        records,
        defaults: MatchConfig::default(),
    }))
}

fn run_matches(req: &mut Request, db: &Database) -> ResultResp {
    let body = read_body(req)?;
    let form = parse_run_form(&body)?;

    let (_, pool) = require_dataset(db)?;
    let runner =
        MatchRunner::new(form.cfg.clone()).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let bases = collect_bases(&pool, &form.base_ids)?;
    let groups = runner.run(&bases, &pool);

    html_response(templates::pages::results_page(&ResultsVm {
        groups,
        cfg: form.cfg,
        base_ids: form.base_ids,
    }))
}

fn export_report(req: &mut Request, db: &Database) -> ResultResp {
    let body = read_body(req)?;
    let form = parse_run_form(&body)?;

    let (info, pool) = require_dataset(db)?;
    let runner =
        MatchRunner::new(form.cfg.clone()).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let bases = collect_bases(&pool, &form.base_ids)?;
    let groups = runner.run(&bases, &pool);

    let filename = format!(
        "comparables_{}",
        if info.filename.is_empty() {
            "report.xlsx".to_string()
        } else {
            info.filename
        }
    );
    export_results_xlsx(&groups, form.cfg.capacity, &filename)
}

/// Fields posted by the dataset and results forms.
struct RunForm {
    base_ids: Vec<usize>,
    cfg: MatchConfig,
}

fn parse_run_form(body: &[u8]) -> Result<RunForm, ServerError> {
    let mut base_ids = Vec::new();
    let mut mv_band = FilterBand::default();
    let mut vpr_band = FilterBand::default();
    let mut capacity = MatchConfig::default().capacity;

    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "base" => base_ids.push(value.trim().parse::<usize>().map_err(|_| {
                ServerError::BadRequest(format!("bad record id: '{value}'"))
            })?),
            "mv_min" => mv_band.min_pct = parse_pct("mv_min", &value)?,
            "mv_max" => mv_band.max_pct = parse_pct("mv_max", &value)?,
            "vpr_min" => vpr_band.min_pct = parse_pct("vpr_min", &value)?,
            "vpr_max" => vpr_band.max_pct = parse_pct("vpr_max", &value)?,
            "capacity" => {
                capacity = value.trim().parse().map_err(|_| {
                    ServerError::BadRequest(format!("capacity must be a whole number, got '{value}'"))
                })?
            }
            _ => {}
        }
    }

    if base_ids.is_empty() {
        return Err(ServerError::BadRequest(
            "select at least one base property".into(),
        ));
    }

    Ok(RunForm {
        base_ids,
        cfg: MatchConfig {
            mv_band,
            vpr_band,
            capacity,
        },
    })
}

fn parse_pct(field: &str, value: &str) -> Result<f64, ServerError> {
    value.trim().parse().map_err(|_| {
        ServerError::BadRequest(format!("{field} must be a number, got '{value}'"))
    })
}

fn require_dataset(
    db: &Database,
) -> Result<(crate::db::DatasetInfo, Vec<PropertyRecord>), ServerError> {
    datasets::load_dataset(db)?
        .ok_or_else(|| ServerError::BadRequest("upload a dataset first".into()))
}

/// Base records come in as row ids; the loaded pool is ordered by row
/// id, so position lookup is enough.
fn collect_bases(
    pool: &[PropertyRecord],
    base_ids: &[usize],
) -> Result<Vec<PropertyRecord>, ServerError> {
    let mut bases = Vec::with_capacity(base_ids.len());
    for id in base_ids {
        let rec = pool.get(*id).ok_or_else(|| {
            ServerError::BadRequest(format!("unknown record id {id}; reload the dataset page"))
        })?;
        bases.push(rec.clone());
    }
    Ok(bases)
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;
    Ok(buf)
}

fn css_response() -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/css; charset=utf-8")
        .body(Body::from(include_str!("../static/main.css").to_string()))
        .map_err(|_| ServerError::InternalError)
}
