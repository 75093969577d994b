/*
 * This module handles the sample ID allow-list: a tab-separated file whose
 * header row names a `matching_method` and a `target_ID` column. Each data
 * row contributes one ID prefix; a candidate sample ID is eligible when at
 * least one listed prefix matches the start of the ID. Rows with a matching
 * method other than "prefix" are ignored with a warning, as are empty and
 * "." placeholder targets.
 *
 * Every line of the file, the header included, must carry at least two
 * tab-separated fields.
 *
 * The module also hosts the InPreD sample nomenclature check used by the
 * optional strict mode.
 */
use regex::Regex;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

const MATCHING_METHOD_COLUMN: &str = "matching_method";
const TARGET_ID_COLUMN: &str = "target_ID";
const PREFIX_METHOD: &str = "prefix";

/*
 * InPreD sample ID layout, e.g. "IPD1234-D02-A01-B01": institution block,
 * sample material/number block, nucleic acid block, biopsy block.
 */
static INPRED_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "^IP[ADHO][0-9]{4}-[CDR](0[1-7]|50|51)-[ACDdEeLMNPpRrTX][0-9]{2}-[ABCEFMS]([0-2][0-9]|30|XX)$",
    )
    .expect("the InPreD nomenclature pattern is valid")
});

/* True when the given sample ID follows the InPreD nomenclature (version 3). */
pub fn is_inpred_id(sample_id: &str) -> bool {
    INPRED_ID_PATTERN.is_match(sample_id)
}

#[derive(Debug)]
pub enum IdListError {
    Io(io::Error),
    ShortLine(String),
    ColumnMissing(&'static str),
}

impl From<io::Error> for IdListError {
    fn from(err: io::Error) -> Self {
        IdListError::Io(err)
    }
}

impl fmt::Display for IdListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdListError::Io(e) => write!(f, "The sample ID list file could not be read: {e}."),
            IdListError::ShortLine(line) => write!(
                f,
                "All lines of the input ID list file should contain at least two fields/columns. The following line has fewer: \"{line}\"."
            ),
            IdListError::ColumnMissing(column) => write!(
                f,
                "Couldn't find the required \"{column}\" data field in the supplied ID list."
            ),
        }
    }
}

impl std::error::Error for IdListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IdListError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IdListError>;

/*
 * The loaded allow-list. Prefixes are kept in file order; `find_match`
 * returns the first one that matches.
 */
#[derive(Debug, Default)]
pub struct IdAllowList {
    prefixes: Vec<String>,
}

impl IdAllowList {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;

        let mut column_indexes: Option<(usize, usize)> = None;
        let mut prefixes = Vec::new();
        for raw_line in text.lines() {
            let line = raw_line.trim();
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                return Err(IdListError::ShortLine(line.to_string()));
            }

            let Some((method_index, target_index)) = column_indexes else {
                let method_index = fields
                    .iter()
                    .position(|field| *field == MATCHING_METHOD_COLUMN)
                    .ok_or(IdListError::ColumnMissing(MATCHING_METHOD_COLUMN))?;
                let target_index = fields
                    .iter()
                    .position(|field| *field == TARGET_ID_COLUMN)
                    .ok_or(IdListError::ColumnMissing(TARGET_ID_COLUMN))?;
                column_indexes = Some((method_index, target_index));
                continue;
            };
            if fields.len() <= method_index.max(target_index) {
                return Err(IdListError::ShortLine(line.to_string()));
            }

            let method = fields[method_index];
            let target = fields[target_index];
            if target.is_empty() || target == "." {
                log::warn!(
                    "IdAllowList: Unsupported ID string (encountered ID value: \"{target}\"). The ID will be ignored."
                );
                continue;
            }
            if method != PREFIX_METHOD {
                log::warn!(
                    "IdAllowList: Unsupported ID matching method keyword encountered (method keyword: \"{method}\", ID: \"{target}\"). The ID will be ignored."
                );
                continue;
            }
            prefixes.push(target.to_string());
        }

        log::info!("IdAllowList: ID loading done ({} IDs loaded).", prefixes.len());
        Ok(IdAllowList { prefixes })
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IdAllowList {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /* First listed prefix that matches the start of `sample_id`, if any. */
    pub fn find_match(&self, sample_id: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| sample_id.starts_with(prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }
}
