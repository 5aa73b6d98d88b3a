//! Error taxonomy for the rename pipeline

use std::fmt;
use std::path::PathBuf;

/// Pipeline stage an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Locate,
    Suggest,
    Select,
    Encode,
    Report,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Locate => "locate",
            Stage::Suggest => "suggest",
            Stage::Select => "select",
            Stage::Encode => "encode",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no file matching {pattern} in {}", .dir.display())]
    NotFound { dir: PathBuf, pattern: String },

    #[error("environment variable {0} is not set")]
    Auth(String),

    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unusable model reply: {0}")]
    Parse(String),

    #[error("{}", selection_message(.input, .count))]
    InvalidSelection { input: String, count: usize },

    #[error("{} already exists (pass --overwrite to replace it)", .0.display())]
    Collision(PathBuf),

    #[error("{0}")]
    Encode(String),

    #[error("{}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Error::Config(_) => Stage::Config,
            Error::NotFound { .. } => Stage::Locate,
            Error::Auth(_) | Error::Network { .. } | Error::Api { .. } | Error::Parse(_) => {
                Stage::Suggest
            }
            Error::InvalidSelection { .. } | Error::Collision(_) => Stage::Select,
            Error::Encode(_) => Stage::Encode,
            Error::Io { stage, .. } => *stage,
        }
    }

    /// Process exit code, distinct per error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound { .. } => 2,
            Error::Auth(_) => 3,
            Error::Network { .. } => 4,
            Error::Api { .. } => 5,
            Error::Parse(_) => 6,
            Error::InvalidSelection { .. } => 7,
            Error::Collision(_) => 8,
            Error::Encode(_) => 9,
            Error::Io { .. } => 10,
            Error::Config(_) => 11,
        }
    }
}

/// `count == 0` means there was no list to choose from, i.e. a bad `--name`
fn selection_message(input: &str, count: &usize) -> String {
    if *count == 0 {
        format!("{:?} is not a usable file name", input)
    } else {
        format!(
            "invalid selection {:?}, expected a number between 1 and {}",
            input, count
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_of_each_kind() {
        assert_eq!(Error::Auth("KEY".into()).stage(), Stage::Suggest);
        assert_eq!(Error::Parse("empty".into()).stage(), Stage::Suggest);
        assert_eq!(Error::Collision(PathBuf::from("/tmp/a.webp")).stage(), Stage::Select);
        assert_eq!(Error::Encode("boom".into()).stage(), Stage::Encode);

        let io = Error::io(
            Stage::Report,
            "/tmp/a.png",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(io.stage(), Stage::Report);
    }

    #[test]
    fn test_exit_codes_are_non_zero_and_distinct() {
        let errors = [
            Error::Config("bad".into()),
            Error::NotFound {
                dir: PathBuf::from("/tmp"),
                pattern: "SCR-*.png".into(),
            },
            Error::Auth("KEY".into()),
            Error::Api {
                status: 500,
                body: String::new(),
            },
            Error::Parse("x".into()),
            Error::InvalidSelection {
                input: "9".into(),
                count: 3,
            },
            Error::Collision(PathBuf::from("a")),
            Error::Encode("x".into()),
            Error::io(Stage::Locate, "a", std::io::Error::other("x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_not_found_message_names_pattern() {
        let err = Error::NotFound {
            dir: PathBuf::from("/home/me/Downloads"),
            pattern: "SCR-*.png".into(),
        };
        assert_eq!(
            err.to_string(),
            "no file matching SCR-*.png in /home/me/Downloads"
        );
    }

    #[test]
    fn test_invalid_selection_messages() {
        let bad_choice = Error::InvalidSelection {
            input: "9".into(),
            count: 3,
        };
        assert_eq!(
            bad_choice.to_string(),
            "invalid selection \"9\", expected a number between 1 and 3"
        );

        let bad_name = Error::InvalidSelection {
            input: "???".into(),
            count: 0,
        };
        assert_eq!(bad_name.to_string(), "\"???\" is not a usable file name");
    }
}
