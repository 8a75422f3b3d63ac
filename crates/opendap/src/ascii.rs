//! Parsing of DAP2 ASCII (`.ascii`) responses.
//!
//! The GrADS data server answers `<dataset>.ascii?<constraint>` with one
//! block per requested array. Each block starts with a header line
//! `name, [d0][d1]...` followed by the values. Multi-dimensional arrays are
//! printed one innermost row per line, prefixed by the indices of the outer
//! dimensions:
//!
//! ```text
//! hgtprs, [1][2][2][3]
//! [0][0][0], 5432.1, 5433.0, 5433.8
//! [0][0][1], 5430.2, 5431.0, 5431.9
//! ...
//! lat, [2]
//! -33.5, -33.0
//! ```
//!
//! A grid request is followed by the blocks of its coordinate maps.

use crate::error::{DapError, DapResult};

/// One array from an ASCII response.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiArray {
    pub name: String,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

/// Parse an ASCII response body into its arrays, in response order.
pub fn parse_ascii(text: &str) -> DapResult<Vec<AsciiArray>> {
    let mut arrays: Vec<AsciiArray> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((name, shape)) = parse_header(line) {
            if let Some(prev) = arrays.last() {
                check_complete(prev)?;
            }
            let capacity = shape.iter().product();
            arrays.push(AsciiArray {
                name,
                shape,
                values: Vec::with_capacity(capacity),
            });
            continue;
        }

        let current = arrays.last_mut().ok_or_else(|| {
            DapError::InvalidFormat(format!(
                "line {}: values before any array header",
                line_no + 1
            ))
        })?;

        let values = if line.starts_with('[') {
            // Strip the "[i][j][k], " outer-index prefix.
            let end = line.rfind(']').unwrap_or(0);
            line[end + 1..].trim_start_matches(',')
        } else {
            line
        };

        for token in values.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let value = token.parse::<f64>().map_err(|_| {
                DapError::InvalidFormat(format!(
                    "line {}: '{}' is not a number in array '{}'",
                    line_no + 1,
                    token,
                    current.name
                ))
            })?;
            current.values.push(value);
        }
    }

    match arrays.last() {
        Some(last) => check_complete(last)?,
        None => {
            return Err(DapError::InvalidFormat(
                "response contains no arrays".to_string(),
            ))
        }
    }

    Ok(arrays)
}

/// Recognise `name, [3][4]`. Grid members may be qualified as
/// `grid.member`; the member name is kept.
fn parse_header(line: &str) -> Option<(String, Vec<usize>)> {
    if line.starts_with('[') {
        return None;
    }
    let (name, dims) = line.split_once(',')?;
    let dims = dims.trim();
    if !dims.starts_with('[') || !dims.ends_with(']') {
        return None;
    }

    let mut shape = Vec::new();
    for part in dims[1..dims.len() - 1].split("][") {
        shape.push(part.trim().parse::<usize>().ok()?);
    }

    let name = name.trim();
    let name = name.rsplit('.').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), shape))
}

fn check_complete(array: &AsciiArray) -> DapResult<()> {
    let expected: usize = array.shape.iter().product();
    if array.values.len() != expected {
        return Err(DapError::InvalidFormat(format!(
            "array '{}' declares {} values but {} were read",
            array.name,
            expected,
            array.values.len()
        )));
    }
    Ok(())
}

/// Extract the message of a DAP2 error body:
///
/// ```text
/// Error {
///     code = 0;
///     message = "GrADS Data Server: invalid dataset";
/// };
/// ```
///
/// Returns `None` if the body is not an error document.
pub fn parse_error_body(text: &str) -> Option<String> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with("Error") {
        return None;
    }
    let rest = trimmed["Error".len()..].trim_start();
    if !rest.starts_with('{') {
        return None;
    }

    let message = rest
        .find("message")
        .and_then(|pos| {
            let after = &rest[pos..];
            let start = after.find('"')? + 1;
            let len = after[start..].find('"')?;
            Some(after[start..start + len].to_string())
        })
        .unwrap_or_else(|| rest.trim().to_string());

    Some(message)
}
