//! One rename-and-convert run, start to finish
//!
//! locate -> suggest -> select -> encode -> report. Every stage either
//! succeeds or ends the run; nothing is retried.

use std::io::{BufRead, Write};

use crate::config::SnapNameConfig;
use crate::encoder::{CommandRunner, Encoder};
use crate::error::{Error, Result, Stage};
use crate::locator::Locator;
use crate::report::ConversionResult;
use crate::selector::{self, Selection};
use crate::suggest::{SuggestionSource, slugify};

/// How the output name is decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    /// Ask the model and let the user pick
    Suggest,
    /// Use this name as given (normalised)
    Fixed(String),
}

pub struct Pipeline<'a, S, R> {
    config: &'a SnapNameConfig,
    source: S,
    encoder: Encoder<R>,
}

impl<'a, S: SuggestionSource, R: CommandRunner> Pipeline<'a, S, R> {
    pub fn new(config: &'a SnapNameConfig, source: S, encoder: Encoder<R>) -> Self {
        Self {
            config,
            source,
            encoder,
        }
    }

    pub fn run<I: BufRead, W: Write>(
        &self,
        naming: &Naming,
        input: &mut I,
        output: &mut W,
    ) -> Result<ConversionResult> {
        let console = |e| Error::io(Stage::Select, "<console>", e);

        let locator = Locator::new(
            self.config.screenshot_dir(),
            self.config.prefix.as_str(),
            self.config.extension.as_str(),
        );
        let shot = locator.newest()?;
        writeln!(output, "Screenshot: {}", shot.path.display()).map_err(console)?;

        let name = match naming {
            Naming::Fixed(name) => {
                let slug = slugify(name);
                if slug.is_empty() {
                    return Err(Error::InvalidSelection {
                        input: name.clone(),
                        count: 0,
                    });
                }
                slug
            }
            Naming::Suggest => {
                let candidates = self.source.suggest(&shot)?;
                selector::prompt(&candidates, input, output)?
            }
        };

        let selection = Selection::new(name, shot.dir(), &self.config.output_extension);
        writeln!(output, "Selected filename: {}", selection.name).map_err(console)?;
        selection.check_collision(self.config.overwrite)?;

        self.encoder.encode(&shot.path, &selection.output_path)?;

        let result = ConversionResult::from_paths(&shot.path, &selection.output_path)?;
        writeln!(output, "{}", result).map_err(|e| Error::io(Stage::Report, "<console>", e))?;
        Ok(result)
    }
}
