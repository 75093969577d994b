/*
 * Path classification, the heart of the tool. Given the snapshot of one
 * processed root and a list of compiled pattern jobs, every path ends up with
 * exactly one disposition:
 *
 *   Export - the path matched at least one extraction pattern,
 *   Ignore - the path is a strict ancestor directory of an Export path,
 *   Skip   - everything else (the default).
 *
 * Matching is full-string against the root-relative path rendered with "/"
 * separators. Export dominates: once a path is Export, no later ancestor
 * marking may downgrade it. The ancestor walk runs from each Export path
 * toward the root, turning Skip into Ignore, passing through paths that are
 * already Ignore, and stopping early at an Export ancestor or at a path
 * missing from the map.
 *
 * The classifier never logs. Under-matched patterns are reported back to the
 * caller as values.
 */
use crate::core::catalog::{PatternCatalog, PatternCategory};
use crate::core::patient_manifest::{
    DNA_NORMAL_ROLE, DNA_TUMOR_ROLE, PatientManifest, RNA_TUMOR_ROLE,
};
use crate::core::sample_sheet::SheetSamples;
use crate::core::snapshot::DirectorySnapshot;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const SAMPLE_ID_TOKEN: &str = "${SAMPLE_ID}";
pub const PAIR_ID_TOKEN: &str = "${PAIR_ID}";
pub const DT_SAMPLE_ID_TOKEN: &str = "${DT_SAMPLE_ID}";
pub const DN_SAMPLE_ID_TOKEN: &str = "${DN_SAMPLE_ID}";
pub const RT_SAMPLE_ID_TOKEN: &str = "${RT_SAMPLE_ID}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDisposition {
    Export,
    Skip,
    Ignore,
}

/* Lexicographic path order keeps every downstream listing deterministic. */
pub type DispositionMap = BTreeMap<PathBuf, PathDisposition>;

/*
 * One pattern ready for matching: placeholders substituted, regex compiled
 * with full-string anchoring. `display_pattern` is the substituted template
 * as it should appear in warnings.
 */
#[derive(Debug)]
pub struct PatternJob {
    pub category: PatternCategory,
    pub display_pattern: String,
    pub min_expected: u32,
    /* Set for per-sample categories; used to attribute warnings. */
    pub sample_id: Option<String>,
    regex: Regex,
}

/* A pattern that matched fewer paths than its catalog row promised. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchShortfall {
    pub category: PatternCategory,
    pub pattern: String,
    pub expected: u32,
    pub found: usize,
    pub sample_id: Option<String>,
}

#[derive(Debug)]
pub enum ClassifyError {
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::BadPattern { pattern, source } => write!(
                f,
                "The following extraction path pattern could not be compiled after placeholder substitution: \"{pattern}\" ({source})."
            ),
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifyError::BadPattern { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

/* Placeholder substitution set for one pattern context. */
struct Substitutions<'a> {
    pairs: Vec<(&'static str, &'a str)>,
}

impl<'a> Substitutions<'a> {
    fn none() -> Self {
        Substitutions { pairs: Vec::new() }
    }

    /* Pair ID first: its token must not survive into the sample ID pass. */
    fn for_sample(sample_id: &'a str, pair_id: &'a str) -> Self {
        Substitutions {
            pairs: vec![(PAIR_ID_TOKEN, pair_id), (SAMPLE_ID_TOKEN, sample_id)],
        }
    }

    /* Only tokens for roles the patient actually has; others stay literal. */
    fn for_patient(manifest: &'a PatientManifest) -> Self {
        let mut pairs = Vec::new();
        if let Some(id) = manifest.role_id(DNA_TUMOR_ROLE) {
            pairs.push((DT_SAMPLE_ID_TOKEN, id));
        }
        if let Some(id) = manifest.role_id(DNA_NORMAL_ROLE) {
            pairs.push((DN_SAMPLE_ID_TOKEN, id));
        }
        if let Some(id) = manifest.role_id(RNA_TUMOR_ROLE) {
            pairs.push((RT_SAMPLE_ID_TOKEN, id));
        }
        Substitutions { pairs }
    }

    fn apply(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (token, value) in &self.pairs {
            result = result.replace(token, value);
        }
        result
    }
}

fn compile_job(
    category: PatternCategory,
    pattern: String,
    min_expected: u32,
    sample_id: Option<String>,
) -> Result<PatternJob> {
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
        ClassifyError::BadPattern {
            pattern: pattern.clone(),
            source,
        }
    })?;
    Ok(PatternJob {
        category,
        display_pattern: pattern,
        min_expected,
        sample_id,
        regex,
    })
}

/*
 * Builds the job list for a LocalApp root. Category order is fixed:
 * general_all, general_bcl, then the per-sample categories with samples in
 * sheet order and patterns in catalog order. The `_bcl` categories are
 * only included for runs that started from BCL files.
 */
pub fn localapp_jobs(
    catalog: &PatternCatalog,
    samples: &SheetSamples,
    from_bcl: bool,
) -> Result<Vec<PatternJob>> {
    let mut jobs = Vec::new();

    for category in [PatternCategory::GeneralAll, PatternCategory::GeneralBcl] {
        if category == PatternCategory::GeneralBcl && !from_bcl {
            continue;
        }
        for (pattern, min_expected) in catalog.patterns_in(category) {
            jobs.push(compile_job(category, pattern.to_string(), min_expected, None)?);
        }
    }

    for category in [
        PatternCategory::SampleDna,
        PatternCategory::SampleRna,
        PatternCategory::SampleDnaBcl,
        PatternCategory::SampleRnaBcl,
    ] {
        let bcl_only = matches!(
            category,
            PatternCategory::SampleDnaBcl | PatternCategory::SampleRnaBcl
        );
        if bcl_only && !from_bcl {
            continue;
        }
        let sample_table = match category {
            PatternCategory::SampleDna | PatternCategory::SampleDnaBcl => &samples.dna,
            _ => &samples.rna,
        };
        for (sample_id, sample) in sample_table {
            let substitutions = Substitutions::for_sample(sample_id, &sample.pair_id);
            for (pattern, min_expected) in catalog.patterns_in(category) {
                jobs.push(compile_job(
                    category,
                    substitutions.apply(pattern),
                    min_expected,
                    Some(sample_id.clone()),
                )?);
            }
        }
    }

    Ok(jobs)
}

/*
 * Builds the job list for one TSOPPI patient directory. T_general always
 * applies; the remaining categories are activated by the roles present in
 * the manifest.
 */
pub fn patient_jobs(catalog: &PatternCatalog, manifest: &PatientManifest) -> Result<Vec<PatternJob>> {
    let has_dna_tumor = manifest.has_role(DNA_TUMOR_ROLE);
    let has_dna_normal = manifest.has_role(DNA_NORMAL_ROLE);
    let has_rna_tumor = manifest.has_role(RNA_TUMOR_ROLE);

    let mut categories = vec![PatternCategory::TGeneral];
    if has_dna_tumor {
        categories.push(PatternCategory::TDnaTumor);
        if has_dna_normal || has_rna_tumor {
            categories.push(PatternCategory::TDnaTumorPlus);
        }
        if has_rna_tumor {
            categories.push(PatternCategory::TDnaTumorRnaTumor);
        }
    }
    if has_dna_tumor || has_dna_normal {
        categories.push(PatternCategory::TAnyDna);
    }
    if has_dna_normal {
        categories.push(PatternCategory::TDnaNormal);
    }
    if has_rna_tumor {
        categories.push(PatternCategory::TRnaTumor);
    }

    let substitutions = Substitutions::for_patient(manifest);
    let mut jobs = Vec::new();
    for category in categories {
        for (pattern, min_expected) in catalog.patterns_in(category) {
            jobs.push(compile_job(
                category,
                substitutions.apply(pattern),
                min_expected,
                None,
            )?);
        }
    }
    Ok(jobs)
}

/*
 * Applies every job to the snapshot and folds the results into one
 * disposition map. The map covers exactly the snapshot's paths; the root
 * itself is absent and acts as the ancestor-walk boundary.
 */
pub fn classify(
    snapshot: &DirectorySnapshot,
    jobs: &[PatternJob],
) -> (DispositionMap, Vec<MatchShortfall>) {
    let root = snapshot.root();
    let mut map: DispositionMap = snapshot
        .paths()
        .iter()
        .map(|path| (path.clone(), PathDisposition::Skip))
        .collect();

    let relative_texts: Vec<(&PathBuf, String)> = snapshot
        .paths()
        .iter()
        .map(|path| (path, relative_text(root, path)))
        .collect();

    let mut shortfalls = Vec::new();
    for job in jobs {
        let matched: Vec<&PathBuf> = relative_texts
            .iter()
            .filter(|(_, text)| job.regex.is_match(text))
            .map(|(path, _)| *path)
            .collect();

        for path in &matched {
            map.insert((*path).clone(), PathDisposition::Export);
        }
        for path in &matched {
            mark_ancestors(root, path, &mut map);
        }

        if matched.len() < job.min_expected as usize {
            shortfalls.push(MatchShortfall {
                category: job.category,
                pattern: job.display_pattern.clone(),
                expected: job.min_expected,
                found: matched.len(),
                sample_id: job.sample_id.clone(),
            });
        }
    }

    (map, shortfalls)
}

/* Root-relative path as a "/"-joined string, the form patterns match against. */
fn relative_text(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut text = String::new();
    for component in relative.components() {
        if !text.is_empty() {
            text.push('/');
        }
        text.push_str(&component.as_os_str().to_string_lossy());
    }
    text
}

fn mark_ancestors(root: &Path, path: &Path, map: &mut DispositionMap) {
    let mut current = path.parent();
    while let Some(ancestor) = current {
        if ancestor == root {
            break;
        }
        match map.get_mut(ancestor) {
            Some(disposition) => {
                if *disposition == PathDisposition::Export {
                    break;
                }
                *disposition = PathDisposition::Ignore;
            }
            None => break,
        }
        current = ancestor.parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_sheet::{EligibleSample, SheetVersion};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn snapshot(root: &str, listing: &[&str]) -> DirectorySnapshot {
        let root = PathBuf::from(root);
        let paths = listing.iter().map(|p| root.join(p)).collect();
        DirectorySnapshot::from_listing(root, paths)
    }

    fn job(pattern: &str, min_expected: u32) -> PatternJob {
        compile_job(
            PatternCategory::GeneralAll,
            pattern.to_string(),
            min_expected,
            None,
        )
        .unwrap()
    }

    fn disposition(map: &DispositionMap, root: &str, path: &str) -> PathDisposition {
        *map.get(&PathBuf::from(root).join(path)).unwrap()
    }

    #[test]
    fn test_classify_marks_matches_ancestors_and_defaults() {
        let snapshot = snapshot(
            "/data/run",
            &[
                "Results",
                "Results/SID1",
                "Results/SID1/SID1.vcf",
                "Results/other.txt",
                "stray.log",
            ],
        );
        let jobs = vec![job("Results/SID1/.*\\.vcf", 1)];

        let (map, shortfalls) = classify(&snapshot, &jobs);

        assert!(shortfalls.is_empty());
        assert_eq!(
            disposition(&map, "/data/run", "Results/SID1/SID1.vcf"),
            PathDisposition::Export
        );
        assert_eq!(
            disposition(&map, "/data/run", "Results/SID1"),
            PathDisposition::Ignore
        );
        assert_eq!(
            disposition(&map, "/data/run", "Results"),
            PathDisposition::Ignore
        );
        assert_eq!(
            disposition(&map, "/data/run", "Results/other.txt"),
            PathDisposition::Skip
        );
        assert_eq!(
            disposition(&map, "/data/run", "stray.log"),
            PathDisposition::Skip
        );
    }

    #[test]
    fn test_classify_requires_full_match() {
        let snapshot = snapshot("/data/run", &["metrics.json", "metrics.json.bak"]);
        let jobs = vec![job("metrics\\.json", 1)];

        let (map, _) = classify(&snapshot, &jobs);

        assert_eq!(
            disposition(&map, "/data/run", "metrics.json"),
            PathDisposition::Export
        );
        assert_eq!(
            disposition(&map, "/data/run", "metrics.json.bak"),
            PathDisposition::Skip
        );
    }

    #[test]
    fn test_classify_never_downgrades_an_exported_directory() {
        let snapshot = snapshot(
            "/data/run",
            &["Results", "Results/SID1", "Results/SID1/SID1.vcf"],
        );
        /* The directory itself matches one pattern, a file inside it another. */
        let jobs = vec![job("Results/SID1", 1), job("Results/SID1/.*\\.vcf", 1)];

        let (map, _) = classify(&snapshot, &jobs);

        assert_eq!(
            disposition(&map, "/data/run", "Results/SID1"),
            PathDisposition::Export
        );
        assert_eq!(
            disposition(&map, "/data/run", "Results"),
            PathDisposition::Ignore
        );
    }

    #[test]
    fn test_classify_is_order_independent() {
        let listing = &[
            "Results",
            "Results/SID1",
            "Results/SID1/SID1.vcf",
            "Results/SID1/SID1.bam",
        ];
        let snapshot_a = snapshot("/data/run", listing);
        let snapshot_b = snapshot("/data/run", listing);

        let forward = vec![job("Results/SID1", 1), job("Results/SID1/.*", 2)];
        let backward = vec![job("Results/SID1/.*", 2), job("Results/SID1", 1)];

        let (map_a, _) = classify(&snapshot_a, &forward);
        let (map_b, _) = classify(&snapshot_b, &backward);

        assert_eq!(map_a, map_b);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let snapshot = snapshot("/data/run", &["a", "a/b.txt", "c.txt"]);
        let jobs = vec![job("a/b\\.txt", 1)];

        let (first, _) = classify(&snapshot, &jobs);
        let (second, _) = classify(&snapshot, &jobs);

        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_reports_shortfalls() {
        let snapshot = snapshot("/data/run", &["one.txt"]);
        let jobs = vec![job("one\\.txt", 1), job("missing\\.txt", 2)];

        let (_, shortfalls) = classify(&snapshot, &jobs);

        assert_eq!(shortfalls.len(), 1);
        let shortfall = &shortfalls[0];
        assert_eq!(shortfall.pattern, "missing\\.txt");
        assert_eq!(shortfall.expected, 2);
        assert_eq!(shortfall.found, 0);
    }

    #[test]
    fn test_compile_job_rejects_bad_pattern() {
        let result = compile_job(PatternCategory::GeneralAll, "(".to_string(), 1, None);
        assert!(matches!(result, Err(ClassifyError::BadPattern { .. })));
    }

    fn sheet_with_one_dna_sample() -> SheetSamples {
        let mut dna = IndexMap::new();
        dna.insert(
            "SID1".to_string(),
            EligibleSample {
                pair_id: "PAIR1".to_string(),
                matched_entry: "SID".to_string(),
            },
        );
        SheetSamples {
            version: SheetVersion::V1,
            dna,
            rna: IndexMap::new(),
        }
    }

    #[test]
    fn test_localapp_jobs_substitute_sample_and_pair_ids() {
        let catalog = PatternCatalog::from_rows(&[
            (PatternCategory::GeneralAll, "metrics\\.json", 1),
            (
                PatternCategory::SampleDna,
                "Results/${SAMPLE_ID}/${PAIR_ID}\\.bam",
                1,
            ),
        ]);
        let samples = sheet_with_one_dna_sample();

        let jobs = localapp_jobs(&catalog, &samples, false).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].display_pattern, "metrics\\.json");
        assert_eq!(jobs[0].sample_id, None);
        assert_eq!(jobs[1].display_pattern, "Results/SID1/PAIR1\\.bam");
        assert_eq!(jobs[1].sample_id.as_deref(), Some("SID1"));
    }

    #[test]
    fn test_localapp_jobs_include_bcl_categories_only_for_bcl_runs() {
        let catalog = PatternCatalog::from_rows(&[
            (PatternCategory::GeneralBcl, "InterOp/.*", 1),
            (PatternCategory::SampleDnaBcl, "${SAMPLE_ID}_S[0-9]+\\.fastq\\.gz", 1),
        ]);
        let samples = sheet_with_one_dna_sample();

        let fastq_run = localapp_jobs(&catalog, &samples, false).unwrap();
        assert!(fastq_run.is_empty());

        let bcl_run = localapp_jobs(&catalog, &samples, true).unwrap();
        assert_eq!(bcl_run.len(), 2);
        assert_eq!(bcl_run[0].category, PatternCategory::GeneralBcl);
        assert_eq!(bcl_run[1].display_pattern, "SID1_S[0-9]+\\.fastq\\.gz");
    }

    fn manifest_with_roles(roles: &[(&str, &str)]) -> PatientManifest {
        let mut manifest = PatientManifest::default();
        for (role, id) in roles {
            manifest.roles.insert((*role).to_string(), (*id).to_string());
            manifest.sample_count += 1;
            manifest.eligible_count += 1;
        }
        manifest
    }

    #[test]
    fn test_patient_jobs_select_categories_by_present_roles() {
        let catalog = PatternCatalog::from_rows(&[
            (PatternCategory::TGeneral, "versions\\.txt", 1),
            (PatternCategory::TDnaTumor, "${DT_SAMPLE_ID}/.*", 1),
            (PatternCategory::TDnaTumorPlus, "${DT_SAMPLE_ID}_vs_${DN_SAMPLE_ID}/.*", 1),
            (PatternCategory::TDnaTumorRnaTumor, "${DT_SAMPLE_ID}_${RT_SAMPLE_ID}/.*", 1),
            (PatternCategory::TAnyDna, "dna_common/.*", 1),
            (PatternCategory::TDnaNormal, "${DN_SAMPLE_ID}/.*", 1),
            (PatternCategory::TRnaTumor, "${RT_SAMPLE_ID}/.*", 1),
        ]);

        let tumor_only = manifest_with_roles(&[(DNA_TUMOR_ROLE, "SID1-DT")]);
        let jobs = patient_jobs(&catalog, &tumor_only).unwrap();
        let patterns: Vec<&str> = jobs.iter().map(|j| j.display_pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["versions\\.txt", "SID1-DT/.*", "dna_common/.*"]
        );

        let tumor_normal = manifest_with_roles(&[
            (DNA_TUMOR_ROLE, "SID1-DT"),
            (DNA_NORMAL_ROLE, "SID1-DN"),
        ]);
        let jobs = patient_jobs(&catalog, &tumor_normal).unwrap();
        let patterns: Vec<&str> = jobs.iter().map(|j| j.display_pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec![
                "versions\\.txt",
                "SID1-DT/.*",
                "SID1-DT_vs_SID1-DN/.*",
                "dna_common/.*",
                "SID1-DN/.*",
            ]
        );
    }

    #[test]
    fn test_patient_jobs_leave_tokens_for_absent_roles_literal() {
        let catalog = PatternCatalog::from_rows(&[(
            PatternCategory::TGeneral,
            "${DT_SAMPLE_ID}_summary\\.txt",
            1,
        )]);
        let rna_only = manifest_with_roles(&[(RNA_TUMOR_ROLE, "SID1-RT")]);

        let jobs = patient_jobs(&catalog, &rna_only).unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].display_pattern, "${DT_SAMPLE_ID}_summary\\.txt");
    }

    #[test]
    fn test_relative_text_joins_components_with_slashes() {
        let root = PathBuf::from("/data/run");
        let path = root.join("Results").join("SID1").join("SID1.vcf");
        assert_eq!(relative_text(&root, &path), "Results/SID1/SID1.vcf");
    }
}
