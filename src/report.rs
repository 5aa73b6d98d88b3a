//! Size statistics for a finished conversion

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Stage};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub output_path: PathBuf,
    pub input_size: u64,
    pub output_size: u64,
    /// Percentage saved, `None` for an empty input
    pub ratio: Option<f64>,
}

impl ConversionResult {
    pub fn new(output_path: PathBuf, input_size: u64, output_size: u64) -> Self {
        Self {
            output_path,
            input_size,
            output_size,
            ratio: compression_ratio(input_size, output_size),
        }
    }

    /// Stat both files after a conversion
    pub fn from_paths(input: &Path, output: &Path) -> Result<Self> {
        let size = |path: &Path| {
            std::fs::metadata(path)
                .map(|m| m.len())
                .map_err(|e| Error::io(Stage::Report, path, e))
        };
        Ok(Self::new(output.to_path_buf(), size(input)?, size(output)?))
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successfully converted to: {}", self.output_path.display())?;
        writeln!(f, "Input size: {} bytes", group_thousands(self.input_size))?;
        writeln!(f, "Output size: {} bytes", group_thousands(self.output_size))?;
        match self.ratio {
            Some(ratio) => write!(f, "Compression ratio: {:.1}%", ratio),
            None => write!(f, "Compression ratio: n/a (empty input)"),
        }
    }
}

/// `(1 - output / input) * 100`, undefined for an empty input
pub fn compression_ratio(input_size: u64, output_size: u64) -> Option<f64> {
    if input_size == 0 {
        return None;
    }
    Some((1.0 - output_size as f64 / input_size as f64) * 100.0)
}

/// Format with `,` between groups of three digits
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
