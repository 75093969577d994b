/*
 * This module loads the extraction-pattern catalog: a tab-separated table in
 * which every row declares (applicable input type, minimum expected match
 * count, pattern category, path pattern). Patterns are kept per category in
 * insertion order; a repeated (category, pattern) pair overwrites the earlier
 * minimum while keeping the original position. Rows for the non-active input
 * type are discarded, but their category names are still validated.
 */
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/* Catalog location baked into the container image; overridable on the CLI. */
pub const DEFAULT_CATALOG_PATH: &str = "/inpred/resources/data/extraction_path_patterns.tsv";

/*
 * The two supported result layouts. The catalog's first column carries these
 * exact tags, and all output files embed them in their names.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    LocalApp,
    Tsoppi,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::LocalApp => "LocalApp",
            InputType::Tsoppi => "TSOPPI",
        }
    }

    /* Value parser for the CLI; the tags are case-sensitive. */
    pub fn from_arg(value: &str) -> std::result::Result<Self, String> {
        match value {
            "LocalApp" => Ok(InputType::LocalApp),
            "TSOPPI" => Ok(InputType::Tsoppi),
            other => Err(format!(
                "unsupported input type \"{other}\" (expected \"LocalApp\" or \"TSOPPI\")"
            )),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
 * The closed set of pattern categories. The first six drive LocalApp runs,
 * the `T_`-prefixed ones drive TSOPPI runs (selected per patient directory
 * based on which sample roles are present).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    GeneralAll,
    GeneralBcl,
    SampleDna,
    SampleRna,
    SampleDnaBcl,
    SampleRnaBcl,
    TGeneral,
    TAnyDna,
    TDnaTumorPlus,
    TDnaTumor,
    TDnaNormal,
    TRnaTumor,
    TDnaTumorRnaTumor,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::GeneralAll => "general_all",
            PatternCategory::GeneralBcl => "general_bcl",
            PatternCategory::SampleDna => "sample_DNA",
            PatternCategory::SampleRna => "sample_RNA",
            PatternCategory::SampleDnaBcl => "sample_DNA_bcl",
            PatternCategory::SampleRnaBcl => "sample_RNA_bcl",
            PatternCategory::TGeneral => "T_general",
            PatternCategory::TAnyDna => "T_any_DNA",
            PatternCategory::TDnaTumorPlus => "T_DNA_tumor_plus",
            PatternCategory::TDnaTumor => "T_DNA_tumor",
            PatternCategory::TDnaNormal => "T_DNA_normal",
            PatternCategory::TRnaTumor => "T_RNA_tumor",
            PatternCategory::TDnaTumorRnaTumor => "T_DNA_tumor_RNA_tumor",
        }
    }

    pub fn from_catalog_tag(tag: &str) -> Option<Self> {
        match tag {
            "general_all" => Some(PatternCategory::GeneralAll),
            "general_bcl" => Some(PatternCategory::GeneralBcl),
            "sample_DNA" => Some(PatternCategory::SampleDna),
            "sample_RNA" => Some(PatternCategory::SampleRna),
            "sample_DNA_bcl" => Some(PatternCategory::SampleDnaBcl),
            "sample_RNA_bcl" => Some(PatternCategory::SampleRnaBcl),
            "T_general" => Some(PatternCategory::TGeneral),
            "T_any_DNA" => Some(PatternCategory::TAnyDna),
            "T_DNA_tumor_plus" => Some(PatternCategory::TDnaTumorPlus),
            "T_DNA_tumor" => Some(PatternCategory::TDnaTumor),
            "T_DNA_normal" => Some(PatternCategory::TDnaNormal),
            "T_RNA_tumor" => Some(PatternCategory::TRnaTumor),
            "T_DNA_tumor_RNA_tumor" => Some(PatternCategory::TDnaTumorRnaTumor),
            _ => None,
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    MalformedLine(String),
    BadMinimum(String),
    UnknownCategory(String),
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => {
                write!(f, "The extraction path pattern file could not be read: {e}.")
            }
            CatalogError::MalformedLine(line) => write!(
                f,
                "Too few columns on the following extraction path pattern file line: \"{line}\"."
            ),
            CatalogError::BadMinimum(line) => write!(
                f,
                "Non-integer minimum match count on the following extraction path pattern file line: \"{line}\"."
            ),
            CatalogError::UnknownCategory(line) => write!(
                f,
                "Unknown pattern category on the following extraction path pattern file line: \"{line}\"."
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/*
 * The loaded catalog for one input type: per category, an insertion-ordered
 * map from pattern template to minimum expected match count.
 */
#[derive(Debug, Default)]
pub struct PatternCatalog {
    tables: IndexMap<PatternCategory, IndexMap<String, u32>>,
}

impl PatternCatalog {
    /*
     * Parses the catalog file, keeping only rows whose input type matches the
     * active run. Category names are validated on every row, including rows
     * that are subsequently discarded.
     */
    pub fn load(path: &Path, input_type: InputType) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut tables: IndexMap<PatternCategory, IndexMap<String, u32>> = IndexMap::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 4 {
                return Err(CatalogError::MalformedLine(line.to_string()));
            }

            let row_input_type = fields[0];
            let min_matches: u32 = fields[1]
                .trim()
                .parse()
                .map_err(|_| CatalogError::BadMinimum(line.to_string()))?;
            let category = PatternCategory::from_catalog_tag(fields[2])
                .ok_or_else(|| CatalogError::UnknownCategory(line.to_string()))?;
            let pattern = fields[3];

            if row_input_type == input_type.as_str() {
                tables
                    .entry(category)
                    .or_default()
                    .insert(pattern.to_string(), min_matches);
            }
        }

        let catalog = PatternCatalog { tables };
        log::debug!(
            "PatternCatalog: Loaded {} patterns across {} categories for input type {input_type}.",
            catalog.pattern_count(),
            catalog.tables.len()
        );
        Ok(catalog)
    }

    /* Patterns of one category in catalog order; empty if the category has no rows. */
    pub fn patterns_in(&self, category: PatternCategory) -> impl Iterator<Item = (&str, u32)> {
        self.tables
            .get(&category)
            .into_iter()
            .flat_map(|table| table.iter().map(|(pattern, min)| (pattern.as_str(), *min)))
    }

    pub fn pattern_count(&self) -> usize {
        self.tables.values().map(|table| table.len()).sum()
    }

    #[cfg(test)]
    pub fn from_rows(rows: &[(PatternCategory, &str, u32)]) -> Self {
        let mut tables: IndexMap<PatternCategory, IndexMap<String, u32>> = IndexMap::new();
        for (category, pattern, min) in rows {
            tables
                .entry(*category)
                .or_default()
                .insert((*pattern).to_string(), *min);
        }
        PatternCatalog { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_catalog(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.as_file_mut().write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_keeps_only_active_input_type() {
        let file = write_catalog(
            "LocalApp\t1\tgeneral_all\tResults/metrics\\.json\n\
             TSOPPI\t1\tT_general\tversions\\.txt\n\
             LocalApp\t2\tsample_DNA\t${SAMPLE_ID}/.*\\.vcf\n",
        );

        let catalog = PatternCatalog::load(file.path(), InputType::LocalApp).unwrap();

        let general: Vec<_> = catalog.patterns_in(PatternCategory::GeneralAll).collect();
        assert_eq!(general, vec![("Results/metrics\\.json", 1)]);
        let dna: Vec<_> = catalog.patterns_in(PatternCategory::SampleDna).collect();
        assert_eq!(dna, vec![("${SAMPLE_ID}/.*\\.vcf", 2)]);
        assert_eq!(catalog.patterns_in(PatternCategory::TGeneral).count(), 0);
        assert_eq!(catalog.pattern_count(), 2);
    }

    #[test]
    fn test_load_rejects_short_line() {
        let file = write_catalog("LocalApp\t1\tgeneral_all\n");
        let result = PatternCatalog::load(file.path(), InputType::LocalApp);
        assert!(matches!(result, Err(CatalogError::MalformedLine(_))));
    }

    #[test]
    fn test_load_rejects_non_integer_minimum() {
        let file = write_catalog("LocalApp\tmany\tgeneral_all\tfoo\n");
        let result = PatternCatalog::load(file.path(), InputType::LocalApp);
        assert!(matches!(result, Err(CatalogError::BadMinimum(_))));
    }

    #[test]
    fn test_load_rejects_unknown_category_even_for_other_input_type() {
        // The row belongs to TSOPPI, but its category must still be valid.
        let file = write_catalog("TSOPPI\t1\tnot_a_category\tfoo\n");
        let result = PatternCatalog::load(file.path(), InputType::LocalApp);
        assert!(matches!(result, Err(CatalogError::UnknownCategory(_))));
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let missing = Path::new("definitely_not_an_existing_catalog.tsv");
        let result = PatternCatalog::load(missing, InputType::LocalApp);
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_duplicate_pattern_overwrites_minimum_in_place() {
        let file = write_catalog(
            "LocalApp\t1\tgeneral_all\tfirst\n\
             LocalApp\t1\tgeneral_all\tsecond\n\
             LocalApp\t5\tgeneral_all\tfirst\n",
        );

        let catalog = PatternCatalog::load(file.path(), InputType::LocalApp).unwrap();

        let general: Vec<_> = catalog.patterns_in(PatternCategory::GeneralAll).collect();
        // "first" keeps its position but carries the later minimum.
        assert_eq!(general, vec![("first", 5), ("second", 1)]);
    }

    #[test]
    fn test_category_tags_round_trip() {
        for tag in [
            "general_all",
            "general_bcl",
            "sample_DNA",
            "sample_RNA",
            "sample_DNA_bcl",
            "sample_RNA_bcl",
            "T_general",
            "T_any_DNA",
            "T_DNA_tumor_plus",
            "T_DNA_tumor",
            "T_DNA_normal",
            "T_RNA_tumor",
            "T_DNA_tumor_RNA_tumor",
        ] {
            let category = PatternCategory::from_catalog_tag(tag).expect(tag);
            assert_eq!(category.as_str(), tag);
        }
        assert!(PatternCategory::from_catalog_tag("general").is_none());
    }

    #[test]
    fn test_input_type_from_arg() {
        assert_eq!(InputType::from_arg("LocalApp").unwrap(), InputType::LocalApp);
        assert_eq!(InputType::from_arg("TSOPPI").unwrap(), InputType::Tsoppi);
        assert!(InputType::from_arg("localapp").is_err());
    }
}
