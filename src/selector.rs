//! Interactive choice between filename candidates

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Stage};

/// The chosen name and where the converted file will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub output_path: PathBuf,
}

impl Selection {
    pub fn new(name: String, dir: &Path, extension: &str) -> Self {
        let output_path = dir.join(format!("{}.{}", name, extension));
        Self { name, output_path }
    }

    /// Refuse an existing output path unless overwriting is allowed
    pub fn check_collision(&self, overwrite: bool) -> Result<()> {
        if self.output_path.exists() {
            if !overwrite {
                return Err(Error::Collision(self.output_path.clone()));
            }
            log::warn!("Overwriting existing {}", self.output_path.display());
        }
        Ok(())
    }
}

/// Map one line of user input to a candidate index.
///
/// Empty input picks the first candidate; otherwise a 1-based ordinal.
pub fn select(candidates: &[String], input: &str) -> Result<usize> {
    let input = input.trim();
    if input.is_empty() && !candidates.is_empty() {
        return Ok(0);
    }
    match input.parse::<usize>() {
        Ok(ordinal) if (1..=candidates.len()).contains(&ordinal) => Ok(ordinal - 1),
        _ => Err(Error::InvalidSelection {
            input: input.to_string(),
            count: candidates.len(),
        }),
    }
}

/// Print the numbered list, read one line, and return the chosen candidate
pub fn prompt<R: BufRead, W: Write>(
    candidates: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    let console = |e| Error::io(Stage::Select, "<console>", e);

    writeln!(output, "\nAI-generated filename suggestions:").map_err(console)?;
    for (i, name) in candidates.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, name).map_err(console)?;
    }
    write!(
        output,
        "\nChoose an option (1-{}) [default: 1]: ",
        candidates.len()
    )
    .map_err(console)?;
    output.flush().map_err(console)?;

    // EOF reads as an empty line, i.e. the default
    let mut line = String::new();
    input.read_line(&mut line).map_err(console)?;

    let index = select(candidates, &line)?;
    Ok(candidates[index].clone())
}
