/*
 * LocalApp sample sheet parsing. The sheet is a sectioned CSV-like file;
 * sample rows live in a data section introduced by a "[Data]" (version 1) or
 * "[TSO500S_Data]" (version 2) marker and closed by the next bracketed
 * section header. Fields are split on commas and tabs alike. The data
 * section's own header row names the columns of interest; their order is not
 * fixed.
 *
 * Rows are checked against the caller's allow-list as they are read. Rows
 * without an ID match are skipped, matched rows optionally have to pass the
 * InPreD nomenclature check, and the survivors are collected per sample type
 * (DNA or RNA, anything else for a matched row is fatal).
 */
use crate::core::id_list::{IdAllowList, is_inpred_id};
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

const SECTION_TAG_V1: &str = "[Data]";
const SECTION_TAG_V2: &str = "[TSO500S_Data]";

const SAMPLE_TYPE_COLUMN: &str = "Sample_Type";
const SAMPLE_ID_COLUMN: &str = "Sample_ID";
const PAIR_ID_COLUMN: &str = "Pair_ID";

const DNA_SAMPLE_TYPE: &str = "DNA";
const RNA_SAMPLE_TYPE: &str = "RNA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetVersion {
    V1,
    V2,
}

impl SheetVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetVersion::V1 => "v1",
            SheetVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for SheetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* One sample that passed the allow-list (and, if enabled, nomenclature) checks. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleSample {
    pub pair_id: String,
    /* The allow-list entry that admitted this sample. */
    pub matched_entry: String,
}

/*
 * The parse result: detected sheet version plus eligible samples keyed by
 * sample ID, split by sample type, in sheet order.
 */
#[derive(Debug)]
pub struct SheetSamples {
    pub version: SheetVersion,
    pub dna: IndexMap<String, EligibleSample>,
    pub rna: IndexMap<String, EligibleSample>,
}

impl SheetSamples {
    pub fn eligible_count(&self) -> usize {
        self.dna.len() + self.rna.len()
    }
}

#[derive(Debug)]
pub enum SheetError {
    Io(io::Error),
    ColumnMissing(&'static str),
    UnknownSampleType {
        sample_id: String,
        sample_type: String,
    },
    VersionNotIdentified,
}

impl From<io::Error> for SheetError {
    fn from(err: io::Error) -> Self {
        SheetError::Io(err)
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::Io(e) => write!(f, "The sample sheet file could not be read: {e}."),
            SheetError::ColumnMissing(column) => write!(
                f,
                "Couldn't find the required \"{column}\" data field in the processed sample sheet file."
            ),
            SheetError::UnknownSampleType {
                sample_id,
                sample_type,
            } => write!(
                f,
                "Unknown sample type encountered (sample ID: \"{sample_id}\", sample type: \"{sample_type}\")."
            ),
            SheetError::VersionNotIdentified => write!(
                f,
                "Sample sheet version not identified, no sample information extracted."
            ),
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

/* Field indexes of the data section's header row. */
struct SheetColumns {
    sample_type: usize,
    sample_id: usize,
    pair_id: usize,
}

impl SheetColumns {
    fn locate(fields: &[&str]) -> Result<Self> {
        let index_of = |column: &'static str| {
            fields
                .iter()
                .position(|field| *field == column)
                .ok_or(SheetError::ColumnMissing(column))
        };
        Ok(SheetColumns {
            sample_type: index_of(SAMPLE_TYPE_COLUMN)?,
            sample_id: index_of(SAMPLE_ID_COLUMN)?,
            pair_id: index_of(PAIR_ID_COLUMN)?,
        })
    }
}

/*
 * Reads the sample sheet at `path` and collects the samples eligible for
 * extraction. Per-row skips are logged here; the caller reports the summary.
 */
pub fn parse_sample_sheet(
    path: &Path,
    allow_list: &IdAllowList,
    require_inpred_nomenclature: bool,
) -> Result<SheetSamples> {
    let text = fs::read_to_string(path)?;

    let mut version: Option<SheetVersion> = None;
    let mut in_data_section = false;
    let mut columns: Option<SheetColumns> = None;
    let mut dna: IndexMap<String, EligibleSample> = IndexMap::new();
    let mut rna: IndexMap<String, EligibleSample> = IndexMap::new();

    for raw_line in text.lines() {
        let normalized = raw_line.trim().replace(',', "\t");
        let fields: Vec<&str> = normalized.split('\t').collect();
        let first = fields[0];

        if first == SECTION_TAG_V1 || first == SECTION_TAG_V2 {
            version = Some(if first == SECTION_TAG_V1 {
                SheetVersion::V1
            } else {
                SheetVersion::V2
            });
            in_data_section = true;
        } else if first.is_empty() {
            /* Blank lines and comma padding carry no information. */
            continue;
        } else if first.starts_with('[') {
            in_data_section = false;
        } else if in_data_section {
            let Some(cols) = &columns else {
                columns = Some(SheetColumns::locate(&fields)?);
                continue;
            };

            let sample_type = fields.get(cols.sample_type).copied().unwrap_or("");
            let sample_id = fields.get(cols.sample_id).copied().unwrap_or("");
            let pair_id = fields.get(cols.pair_id).copied().unwrap_or("");

            let Some(matched_entry) = allow_list.find_match(sample_id) else {
                log::info!(
                    "SampleSheet: Skipping {sample_type} sample \"{sample_id}\" (no ID match)."
                );
                continue;
            };
            if require_inpred_nomenclature && !is_inpred_id(sample_id) {
                log::warn!(
                    "SampleSheet: The following sample ID doesn't comply with the InPreD ID nomenclature: \"{sample_id}\". The sample will be ignored."
                );
                continue;
            }

            let sample = EligibleSample {
                pair_id: pair_id.to_string(),
                matched_entry: matched_entry.to_string(),
            };
            match sample_type {
                DNA_SAMPLE_TYPE => {
                    dna.insert(sample_id.to_string(), sample);
                }
                RNA_SAMPLE_TYPE => {
                    rna.insert(sample_id.to_string(), sample);
                }
                other => {
                    return Err(SheetError::UnknownSampleType {
                        sample_id: sample_id.to_string(),
                        sample_type: other.to_string(),
                    });
                }
            }
        }
    }

    let version = version.ok_or(SheetError::VersionNotIdentified)?;
    Ok(SheetSamples { version, dna, rna })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_sheet(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.as_file_mut().write_all(content.as_bytes()).unwrap();
        file
    }

    fn allow(prefixes: &[&str]) -> IdAllowList {
        IdAllowList::from_prefixes(prefixes.iter().copied())
    }

    #[test]
    fn test_parse_v1_sheet_with_comma_fields() {
        let file = write_sheet(
            "[Header],,\n\
             RunName,Run001,\n\
             ,,\n\
             [Data],,\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             SID1,DNA,PAIR1\n\
             SID2,RNA,PAIR1\n\
             OTHER1,DNA,PAIR9\n",
        );

        let samples = parse_sample_sheet(file.path(), &allow(&["SID"]), false).unwrap();

        assert_eq!(samples.version, SheetVersion::V1);
        assert_eq!(samples.dna.len(), 1);
        assert_eq!(samples.rna.len(), 1);
        let dna = samples.dna.get("SID1").unwrap();
        assert_eq!(dna.pair_id, "PAIR1");
        assert_eq!(dna.matched_entry, "SID");
        assert!(samples.rna.contains_key("SID2"));
        assert_eq!(samples.eligible_count(), 2);
    }

    #[test]
    fn test_parse_v2_sheet_tag() {
        let file = write_sheet(
            "[TSO500S_Data]\n\
             Sample_Type\tSample_ID\tPair_ID\n\
             DNA\tSID1\tP1\n",
        );

        let samples = parse_sample_sheet(file.path(), &allow(&["SID"]), false).unwrap();
        assert_eq!(samples.version, SheetVersion::V2);
        assert!(samples.dna.contains_key("SID1"));
    }

    #[test]
    fn test_parse_stops_at_next_section_header() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             SID1,DNA,P1\n\
             [Settings]\n\
             SID2,RNA,P1\n",
        );

        let samples = parse_sample_sheet(file.path(), &allow(&["SID"]), false).unwrap();
        assert!(samples.dna.contains_key("SID1"));
        assert!(samples.rna.is_empty());
    }

    #[test]
    fn test_parse_requires_all_columns() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type\n\
             SID1,DNA\n",
        );

        let result = parse_sample_sheet(file.path(), &allow(&["SID"]), false);
        assert!(matches!(
            result,
            Err(SheetError::ColumnMissing(PAIR_ID_COLUMN))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_type_for_matched_sample() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             SID1,cfDNA,P1\n",
        );

        let result = parse_sample_sheet(file.path(), &allow(&["SID"]), false);
        assert!(matches!(
            result,
            Err(SheetError::UnknownSampleType { .. })
        ));
    }

    #[test]
    fn test_parse_ignores_unknown_type_without_id_match() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             OTHER1,cfDNA,P1\n\
             SID1,DNA,P1\n",
        );

        let samples = parse_sample_sheet(file.path(), &allow(&["SID"]), false).unwrap();
        assert_eq!(samples.eligible_count(), 1);
    }

    #[test]
    fn test_parse_without_data_section_is_fatal() {
        let file = write_sheet("[Header]\nRunName,Run001\n");
        let result = parse_sample_sheet(file.path(), &allow(&["SID"]), false);
        assert!(matches!(result, Err(SheetError::VersionNotIdentified)));
    }

    #[test]
    fn test_parse_enforces_nomenclature_when_requested() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             IPD1234-C01-A01-B01,DNA,P1\n\
             IPD1234-BADID,RNA,P1\n",
        );
        let list = allow(&["IPD1234"]);

        let strict = parse_sample_sheet(file.path(), &list, true).unwrap();
        assert_eq!(strict.eligible_count(), 1);
        assert!(strict.dna.contains_key("IPD1234-C01-A01-B01"));

        let lenient = parse_sample_sheet(file.path(), &list, false).unwrap();
        assert_eq!(lenient.eligible_count(), 2);
    }

    #[test]
    fn test_parse_with_header_but_no_eligible_samples() {
        let file = write_sheet(
            "[Data]\n\
             Sample_ID,Sample_Type,Pair_ID\n\
             OTHER1,DNA,P1\n",
        );

        let samples = parse_sample_sheet(file.path(), &allow(&["SID"]), false).unwrap();
        assert_eq!(samples.eligible_count(), 0);
        assert_eq!(samples.version, SheetVersion::V1);
    }
}
