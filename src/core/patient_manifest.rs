/*
 * TSOPPI per-patient manifest parsing. Every patient sub-directory carries a
 * "sample_list.tsv" whose header line is prefixed with "#" and names at least
 * the `sample_type` and `sample_output_ID` columns. Each data row declares
 * one sample: its role (DNA_tumor, DNA_normal, RNA_tumor, or any other
 * string) and its output ID.
 *
 * The parse keeps a role-to-ID map for the rows that pass the allow-list
 * (and optional nomenclature) checks, plus row counts that let the caller
 * apply the directory-level policy: a patient directory is exported only
 * when every listed sample is eligible.
 */
use crate::core::id_list::{IdAllowList, is_inpred_id};
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

pub const SAMPLE_LIST_FILENAME: &str = "sample_list.tsv";

pub const DNA_TUMOR_ROLE: &str = "DNA_tumor";
pub const DNA_NORMAL_ROLE: &str = "DNA_normal";
pub const RNA_TUMOR_ROLE: &str = "RNA_tumor";

const SAMPLE_TYPE_COLUMN: &str = "sample_type";
const SAMPLE_OUTPUT_ID_COLUMN: &str = "sample_output_ID";

#[derive(Debug)]
pub enum ManifestError {
    Io(io::Error),
    ColumnMissing(&'static str),
    DataBeforeHeader(String),
}

impl From<io::Error> for ManifestError {
    fn from(err: io::Error) -> Self {
        ManifestError::Io(err)
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(e) => write!(f, "The sample list file could not be read: {e}."),
            ManifestError::ColumnMissing(column) => write!(
                f,
                "Couldn't find the required \"{column}\" data field in the accessed sample list."
            ),
            ManifestError::DataBeforeHeader(line) => write!(
                f,
                "Encountered a sample list data line before any header line: \"{line}\"."
            ),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;

/*
 * The digest of one patient manifest. `roles` holds eligible rows only; a
 * repeated role keeps its first position with the later sample ID.
 */
#[derive(Debug, Default)]
pub struct PatientManifest {
    pub roles: IndexMap<String, String>,
    pub sample_count: usize,
    pub eligible_count: usize,
}

impl PatientManifest {
    pub fn all_samples_eligible(&self) -> bool {
        self.sample_count == self.eligible_count
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn role_id(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(String::as_str)
    }
}

/*
 * Reads the manifest at `path`. Per-sample match results are logged here;
 * the directory verdict is the caller's.
 */
pub fn parse_patient_manifest(
    path: &Path,
    allow_list: &IdAllowList,
    require_inpred_nomenclature: bool,
) -> Result<PatientManifest> {
    let text = fs::read_to_string(path)?;

    let mut columns: Option<(usize, usize)> = None;
    let mut manifest = PatientManifest::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            let header_fields: Vec<&str> = line.trim_start_matches('#').split('\t').collect();
            let type_index = header_fields
                .iter()
                .position(|field| *field == SAMPLE_TYPE_COLUMN)
                .ok_or(ManifestError::ColumnMissing(SAMPLE_TYPE_COLUMN))?;
            let id_index = header_fields
                .iter()
                .position(|field| *field == SAMPLE_OUTPUT_ID_COLUMN)
                .ok_or(ManifestError::ColumnMissing(SAMPLE_OUTPUT_ID_COLUMN))?;
            columns = Some((type_index, id_index));
            continue;
        }

        let Some((type_index, id_index)) = columns else {
            return Err(ManifestError::DataBeforeHeader(line.to_string()));
        };
        let fields: Vec<&str> = line.split('\t').collect();
        let sample_type = fields.get(type_index).copied().unwrap_or("");
        let sample_id = fields.get(id_index).copied().unwrap_or("");

        manifest.sample_count += 1;

        let Some(matched_entry) = allow_list.find_match(sample_id) else {
            log::info!("PatientManifest: No ID match for sample \"{sample_id}\".");
            continue;
        };
        if require_inpred_nomenclature && !is_inpred_id(sample_id) {
            log::warn!(
                "PatientManifest: The following sample ID doesn't comply with the InPreD ID nomenclature: \"{sample_id}\". The sample will be ignored."
            );
            continue;
        }

        log::info!("PatientManifest: ID match for sample \"{sample_id}\" (\"{matched_entry}\").");
        manifest.eligible_count += 1;
        manifest
            .roles
            .insert(sample_type.to_string(), sample_id.to_string());
    }

    Ok(manifest)
}
