//! Dataset Descriptor Structure (DDS) parsing.
//!
//! Only the subset of DAP2 grammar the GrADS data server emits is handled:
//! top-level arrays and `Grid` blocks whose `ARRAY:` part declares the
//! variable and whose `MAPS:` part repeats the coordinate arrays.

use crate::error::{DapError, DapResult};

/// A named dimension with its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

/// Declaration of one array (or grid array) in a DDS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDecl {
    pub name: String,
    pub data_type: String,
    pub dimensions: Vec<Dimension>,
}

impl ArrayDecl {
    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.size).collect()
    }
}

/// Parsed DDS.
#[derive(Debug, Clone, Default)]
pub struct Dds {
    pub name: String,
    pub variables: Vec<ArrayDecl>,
}

impl Dds {
    pub fn get(&self, name: &str) -> Option<&ArrayDecl> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Fail with [`DapError::MissingVariable`] unless every name is declared.
    pub fn require(&self, names: &[&str]) -> DapResult<()> {
        for name in names {
            if self.get(name).is_none() {
                return Err(DapError::MissingVariable(format!(
                    "'{}' not declared in dataset '{}'",
                    name, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Parse a DDS document.
pub fn parse_dds(text: &str) -> DapResult<Dds> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.starts_with("Dataset") => {}
        Some(first) => {
            return Err(DapError::InvalidFormat(format!(
                "DDS does not start with 'Dataset': '{}'",
                first
            )))
        }
        None => return Err(DapError::InvalidFormat("empty DDS".to_string())),
    }

    let mut dds = Dds::default();
    let mut in_maps = false;
    let mut depth = 1usize;

    for line in lines {
        if line.starts_with("Grid") {
            depth += 1;
            in_maps = false;
            continue;
        }
        match line {
            "ARRAY:" => {
                in_maps = false;
                continue;
            }
            "MAPS:" => {
                in_maps = true;
                continue;
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix('}') {
            depth = depth.saturating_sub(1);
            in_maps = false;
            if depth == 0 {
                dds.name = rest.trim().trim_end_matches(';').trim().to_string();
            }
            continue;
        }

        if in_maps {
            continue;
        }

        let decl = parse_declaration(line)?;
        if dds.get(&decl.name).is_none() {
            dds.variables.push(decl);
        }
    }

    if depth != 0 {
        return Err(DapError::InvalidFormat("unterminated DDS".to_string()));
    }

    Ok(dds)
}

/// Parse a declaration like `Float32 hgtprs[time = 81][lev = 41];`.
fn parse_declaration(line: &str) -> DapResult<ArrayDecl> {
    let invalid = || DapError::InvalidFormat(format!("unrecognised DDS line: '{}'", line));

    let body = line.strip_suffix(';').ok_or_else(invalid)?.trim();
    let (data_type, rest) = body.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let rest = rest.trim();

    let (name, dims) = match rest.find('[') {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    let mut dimensions = Vec::new();
    for part in dims.split('[').skip(1) {
        let part = part.trim().strip_suffix(']').ok_or_else(invalid)?;
        let (dim_name, size) = part.split_once('=').ok_or_else(invalid)?;
        let size = size.trim().parse().map_err(|_| invalid())?;
        dimensions.push(Dimension {
            name: dim_name.trim().to_string(),
            size,
        });
    }

    Ok(ArrayDecl {
        name: name.trim().to_string(),
        data_type: data_type.to_string(),
        dimensions,
    })
}
