//! Output formatting
//!
//! A [`Summary`] describes one registered result; `text` prints it for humans
//! and `json` writes it, with run metadata, as a report file.

pub mod json;
pub mod text;

use crate::distributed::DistArray;
use crate::request::{Entry, GeneratedArray};
use serde::{Deserialize, Serialize};

/// Min, max and mean of a numeric array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Description of one generated result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub name: String,
    /// dtype name, or `strings`
    pub kind: String,
    /// Elements (or strings)
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_fraction: Option<f64>,
    /// Byte buffer size for strings, terminators included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bytes: Option<usize>,
    /// Leading elements, rendered
    pub preview: Vec<String>,
}

fn numeric_stats<T: Copy + Into<f64>>(values: impl Iterator<Item = T>) -> Option<NumericStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        let v: f64 = value.into();
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    (count > 0).then(|| NumericStats {
        min,
        max,
        mean: sum / count as f64,
    })
}

fn preview_of<T: ToString>(array: &DistArray<T>, preview: usize) -> Vec<String> {
    array.iter().take(preview).map(ToString::to_string).collect()
}

impl Summary {
    /// Summarize `entry`, rendering at most `preview` leading elements
    pub fn from_entry(name: &str, entry: &Entry, preview: usize) -> Self {
        let mut summary = Summary {
            name: name.to_string(),
            kind: String::new(),
            size: 0,
            stats: None,
            true_fraction: None,
            num_bytes: None,
            preview: Vec::new(),
        };

        match entry {
            Entry::Array(array) => {
                summary.kind = array.dtype().name().to_string();
                summary.size = array.len();
                match array {
                    // i64/u64 go through f64; precision loss is fine for a summary
                    GeneratedArray::Int64(a) => {
                        summary.stats = numeric_stats(a.iter().map(|&v| v as f64));
                        summary.preview = preview_of(a, preview);
                    }
                    GeneratedArray::UInt64(a) => {
                        summary.stats = numeric_stats(a.iter().map(|&v| v as f64));
                        summary.preview = preview_of(a, preview);
                    }
                    GeneratedArray::Float64(a) => {
                        summary.stats = numeric_stats(a.iter().copied());
                        summary.preview = preview_of(a, preview);
                    }
                    GeneratedArray::UInt8(a) => {
                        summary.stats = numeric_stats(a.iter().copied());
                        summary.preview = preview_of(a, preview);
                    }
                    GeneratedArray::Bool(a) => {
                        if !a.is_empty() {
                            let trues = a.iter().filter(|&&b| b).count();
                            summary.true_fraction = Some(trues as f64 / a.len() as f64);
                        }
                        summary.preview = preview_of(a, preview);
                    }
                }
            }
            Entry::Strings(strings) => {
                summary.kind = "strings".to_string();
                summary.size = strings.len();
                summary.num_bytes = Some(strings.num_bytes());
                summary.stats = numeric_stats(strings.iter().map(|s| s.len() as f64));
                summary.preview = strings
                    .iter()
                    .take(preview)
                    .map(|s| format!("{:?}", String::from_utf8_lossy(s)))
                    .collect();
            }
        }

        summary
    }
}
