// src/upload.rs

use crate::errors::ServerError;

/// The file part pulled out of a multipart upload.
#[derive(Debug, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Pulls the boundary parameter out of a multipart/form-data
/// Content-Type header, if that is what this is.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let mime: mime::Mime = content_type.parse().ok()?;
    if mime.type_() != mime::MULTIPART || mime.subtype() != mime::FORM_DATA {
        return None;
    }
    mime.get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_string())
}

/// Minimal multipart/form-data scan: returns the first part carrying a
/// filename. Enough for the single-file upload form; anything more
/// exotic is rejected as malformed.
pub fn extract_file(body: &[u8], boundary: &str) -> Result<UploadedFile, ServerError> {
    let delim = format!("--{boundary}").into_bytes();
    let mut pos = find(body, &delim, 0).ok_or_else(|| {
        ServerError::UploadError("malformed multipart body: boundary not found".into())
    })?;

    loop {
        pos += delim.len();
        // The terminal boundary is followed by "--".
        if body[pos..].starts_with(b"--") {
            break;
        }
        if body[pos..].starts_with(b"\r\n") {
            pos += 2;
        }

        let header_end = find(body, b"\r\n\r\n", pos).ok_or_else(|| {
            ServerError::UploadError("malformed multipart part: headers not terminated".into())
        })?;
        let headers = String::from_utf8_lossy(&body[pos..header_end]);

        let content_start = header_end + 4;
        let next = find(body, &delim, content_start).ok_or_else(|| {
            ServerError::UploadError("malformed multipart body: part not terminated".into())
        })?;
        // Content ends at the CRLF preceding the next boundary.
        let content_end = next.saturating_sub(2).max(content_start);

        if let Some(filename) = disposition_filename(&headers) {
            return Ok(UploadedFile {
                filename,
                data: body[content_start..content_end].to_vec(),
            });
        }
        pos = next;
    }

    Err(ServerError::UploadError(
        "the upload did not include a file".into(),
    ))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn disposition_filename(headers: &str) -> Option<String> {
    for line in headers.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("content-disposition") {
            continue;
        }
        for param in value.split(';') {
            if let Some(rest) = param.trim().strip_prefix("filename=") {
                return Some(rest.trim_matches('"').to_string());
            }
        }
    }
    None
}
