/*
 * Glob-based discovery of single expected files inside the input directory.
 * The LocalApp layout names its sample sheet and top-level run log with
 * run-specific components, so both are located by pattern; exactly one match
 * is acceptable in each case.
 */
use glob::Pattern;
use std::fmt;
use std::path::{Path, PathBuf};

/* LocalApp sample sheet, relative to the input directory. */
pub const SAMPLE_SHEET_GLOB: &str =
    "Logs_Intermediates/SamplesheetValidation/*_SampleSheet.csv";
/* LocalApp top-level run log, relative to the input directory. */
pub const RUN_LOG_GLOB: &str = "trusight-oncology-500-ruo_ruo-2.2.0.12*.log";

#[derive(Debug)]
pub enum DiscoveryError {
    NoMatch {
        description: String,
        pattern: String,
    },
    MultipleMatches {
        description: String,
        pattern: String,
    },
    BadPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

impl DiscoveryError {
    pub fn is_multiple(&self) -> bool {
        matches!(self, DiscoveryError::MultipleMatches { .. })
    }
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NoMatch {
                description,
                pattern,
            } => write!(
                f,
                "No {description} found at the expected location (\"{pattern}\"). A single file is expected."
            ),
            DiscoveryError::MultipleMatches {
                description,
                pattern,
            } => write!(
                f,
                "Multiple {description}s found at the expected location (\"{pattern}\"). A single file is expected."
            ),
            DiscoveryError::BadPattern { pattern, source } => {
                write!(f, "The search pattern \"{pattern}\" is not valid: {source}.")
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::BadPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/*
 * Resolves `relative_pattern` under `search_root` and requires exactly one
 * match. Error messages render the pattern under `display_root`, which lets
 * the caller report host-system paths while searching container ones.
 */
pub fn find_single(
    search_root: &Path,
    display_root: &Path,
    relative_pattern: &str,
    description: &str,
) -> Result<PathBuf> {
    let display_pattern = format!("{}/{relative_pattern}", display_root.display());
    let search_pattern = format!(
        "{}/{relative_pattern}",
        Pattern::escape(&search_root.to_string_lossy())
    );

    let entries = glob::glob(&search_pattern).map_err(|source| DiscoveryError::BadPattern {
        pattern: display_pattern.clone(),
        source,
    })?;
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => matches.push(path),
            Err(err) => {
                log::warn!("Discovery: Skipping an unreadable match for \"{display_pattern}\": {err}.");
            }
        }
    }

    match matches.len() {
        0 => Err(DiscoveryError::NoMatch {
            description: description.to_string(),
            pattern: display_pattern,
        }),
        1 => {
            let found = matches.remove(0);
            log::info!(
                "Discovery: The following {description} will be utilized: \"{}\".",
                found.display()
            );
            Ok(found)
        }
        _ => Err(DiscoveryError::MultipleMatches {
            description: description.to_string(),
            pattern: display_pattern,
        }),
    }
}
