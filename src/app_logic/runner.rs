/*
 * Drives one extraction run end to end: path-view validation, output layout
 * resolution, sample eligibility, path classification, export plan writing
 * and packaging-script generation/execution. Every fatal condition maps to
 * the tool's per-condition exit code through `RunError::exit_code`.
 */
use crate::cli::CliArgs;
use crate::core::catalog::CatalogError;
use crate::core::classifier::ClassifyError;
use crate::core::discovery::{self, DiscoveryError};
use crate::core::export_plan::PlanError;
use crate::core::id_list::IdListError;
use crate::core::localapp_logs;
use crate::core::patient_manifest::{self, ManifestError};
use crate::core::sample_sheet::{self, SheetError};
use crate::core::{
    DirectorySnapshot, DispositionMap, ExportPlan, IdAllowList, InputType, MatchShortfall,
    MountMapping, PathDisposition, PatternCatalog, ScriptRunnerOperations, ScriptSettings,
    SheetSamples, classify, localapp_jobs, patient_jobs,
};
use crate::logging::LateFileSink;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;

/* Which user-supplied path failed validation; selects message text and exit code. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    OutputDirectory,
    GpgPasswordFile,
    SampleIdFile,
    InputDirectory,
}

impl PathRole {
    fn description(self) -> &'static str {
        match self {
            PathRole::OutputDirectory => "output directory",
            PathRole::GpgPasswordFile => "GPG password file",
            PathRole::SampleIdFile => "sample ID file",
            PathRole::InputDirectory => "input directory",
        }
    }

    fn prefix_exit_code(self) -> i32 {
        match self {
            PathRole::OutputDirectory => 2,
            PathRole::GpgPasswordFile => 4,
            PathRole::SampleIdFile => 6,
            PathRole::InputDirectory => 8,
        }
    }
}

#[derive(Debug)]
pub enum RunError {
    ForbiddenPrefixCharacter(char),
    OutsideMount {
        role: PathRole,
        path: PathBuf,
        prefix: PathBuf,
    },
    OutputDirectoryCreation(io::Error),
    MissingPasswordFile(PathBuf),
    MissingIdListFile(PathBuf),
    MissingInputDirectory(PathBuf),
    IdList(IdListError),
    Catalog(CatalogError),
    Pattern(ClassifyError),
    MissingLogsIntermediates,
    Discovery {
        base_code: i32,
        source: DiscoveryError,
    },
    Sheet(SheetError),
    Manifest(ManifestError),
    Plan(PlanError),
    Io(io::Error),
}

impl From<IdListError> for RunError {
    fn from(err: IdListError) -> Self {
        RunError::IdList(err)
    }
}

impl From<CatalogError> for RunError {
    fn from(err: CatalogError) -> Self {
        RunError::Catalog(err)
    }
}

impl From<ClassifyError> for RunError {
    fn from(err: ClassifyError) -> Self {
        RunError::Pattern(err)
    }
}

impl From<SheetError> for RunError {
    fn from(err: SheetError) -> Self {
        RunError::Sheet(err)
    }
}

impl From<ManifestError> for RunError {
    fn from(err: ManifestError) -> Self {
        RunError::Manifest(err)
    }
}

impl From<PlanError> for RunError {
    fn from(err: PlanError) -> Self {
        RunError::Plan(err)
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        RunError::Io(err)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::ForbiddenPrefixCharacter(character) => write!(
                f,
                "The supplied output file prefix contains forbidden characters (\"{character}\"). Please refer to the help message for more information."
            ),
            RunError::OutsideMount { role, path, prefix } => write!(
                f,
                "Provided {} path (\"{}\") does not include the specified directory prefix (\"{}\").",
                role.description(),
                path.display(),
                prefix.display()
            ),
            RunError::OutputDirectoryCreation(source) => write!(
                f,
                "Could not create the output directory. Please make sure that its parent directory already exists. The original error message: \"{source}\"."
            ),
            RunError::MissingPasswordFile(path) => write!(
                f,
                "Specified GPG password file (\"{}\") couldn't be located within the container.",
                path.display()
            ),
            RunError::MissingIdListFile(path) => write!(
                f,
                "Specified sample ID file (\"{}\") couldn't be located within the container.",
                path.display()
            ),
            RunError::MissingInputDirectory(host_path) => write!(
                f,
                "The specified input data directory couldn't be located (host system path: \"{}\").",
                host_path.display()
            ),
            RunError::MissingLogsIntermediates => {
                write!(f, "Unable to find the \"Logs_Intermediates\" sub-directory.")
            }
            RunError::IdList(source) => source.fmt(f),
            RunError::Catalog(source) => source.fmt(f),
            RunError::Pattern(source) => source.fmt(f),
            RunError::Discovery { source, .. } => source.fmt(f),
            RunError::Sheet(source) => source.fmt(f),
            RunError::Manifest(source) => source.fmt(f),
            RunError::Plan(source) => source.fmt(f),
            RunError::Io(source) => {
                write!(f, "An input/output operation failed unexpectedly: {source}.")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::OutputDirectoryCreation(source) | RunError::Io(source) => Some(source),
            RunError::IdList(source) => Some(source),
            RunError::Catalog(source) => Some(source),
            RunError::Pattern(source) => Some(source),
            RunError::Discovery { source, .. } => Some(source),
            RunError::Sheet(source) => Some(source),
            RunError::Manifest(source) => Some(source),
            RunError::Plan(source) => Some(source),
            _ => None,
        }
    }
}

impl RunError {
    /*
     * The command-line exit code contract. Residual I/O failures share the
     * general failure code 1.
     */
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::ForbiddenPrefixCharacter(_) => 1,
            RunError::OutsideMount { role, .. } => role.prefix_exit_code(),
            RunError::OutputDirectoryCreation(_) => 3,
            RunError::MissingPasswordFile(_) => 5,
            RunError::MissingIdListFile(_) => 7,
            RunError::MissingInputDirectory(_) => 9,
            RunError::IdList(IdListError::ShortLine(_)) => 10,
            RunError::IdList(IdListError::ColumnMissing(_)) => 18,
            RunError::IdList(IdListError::Io(_)) => 1,
            RunError::Catalog(CatalogError::UnknownCategory(_)) => 12,
            RunError::Catalog(_) => 11,
            RunError::Pattern(_) => 11,
            RunError::MissingLogsIntermediates => 21,
            RunError::Discovery { base_code, source } => {
                if source.is_multiple() {
                    *base_code + 9
                } else {
                    *base_code
                }
            }
            RunError::Sheet(SheetError::ColumnMissing(_)) => 15,
            RunError::Sheet(SheetError::UnknownSampleType { .. }) => 16,
            RunError::Sheet(SheetError::VersionNotIdentified) => 17,
            RunError::Sheet(SheetError::Io(_)) => 1,
            RunError::Manifest(ManifestError::Io(_)) => 1,
            RunError::Manifest(_) => 18,
            RunError::Plan(_) => 19,
            RunError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;

/* How a successful run ended. Every variant exits with code 0. */
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /* Lists and script written; the script may additionally have been run. */
    Completed {
        exported: usize,
        skipped: usize,
        ignored: usize,
        script_executed: bool,
    },
    /* Key outputs already present and overwriting disabled; nothing touched. */
    OutputsExist,
    /* The sample sheet yielded no eligible samples. */
    NoEligibleSamples,
    /* Both lists written, but the export list is empty; no script produced. */
    NothingQualified,
}

/* Container-view working paths with the host-system originals kept for reporting. */
struct ResolvedPaths {
    output_dir_host: PathBuf,
    output_dir: PathBuf,
    password_file_host: PathBuf,
    password_file: PathBuf,
    id_list_host: PathBuf,
    id_list: PathBuf,
    input_dir_host: PathBuf,
    input_dir: PathBuf,
}

/* Every per-run output location, plus the packaging script's settings. */
struct OutputLayout {
    log_file: PathBuf,
    export_list: PathBuf,
    skip_list: PathBuf,
    inherited_errors: PathBuf,
    script: ScriptSettings,
}

/*
 * Runs the whole extraction pipeline for `args`. `log_sink` is attached to
 * the run-log file once the overwrite gate has passed; `script_runner`
 * executes the generated packaging script (tests substitute a recording
 * stand-in).
 */
pub fn execute(
    args: &CliArgs,
    log_sink: &LateFileSink,
    script_runner: Arc<dyn ScriptRunnerOperations>,
) -> Result<RunOutcome> {
    let prefix = resolve_prefix(args)?;
    let mapping = MountMapping::new(
        &args.host_system_mounting_directory,
        &args.container_mounting_directory,
    );
    let paths = validate_paths(args, &mapping)?;
    let layout = resolve_output_layout(args, &paths, &prefix);

    if !args.rewrite_output && outputs_already_exist(&layout) {
        log::info!(
            "Runner: (Some of) the target output files already exist and output overwriting has been disabled. Exiting."
        );
        return Ok(RunOutcome::OutputsExist);
    }

    log_sink.attach(&layout.log_file, args.append_log)?;

    log::info!(
        "Runner: Sample Packer, version {}.",
        env!("CARGO_PKG_VERSION")
    );
    log_parameter_echo(args, &paths, &prefix);

    log::info!("Runner: Loading the supplied IDs...");
    let allow_list = IdAllowList::load(&paths.id_list)?;

    let catalog = PatternCatalog::load(&args.extraction_patterns_file, args.input_type)?;

    let map = match args.input_type {
        InputType::LocalApp => {
            match localapp_dispositions(args, &paths, &layout, &allow_list, &catalog)? {
                Some(map) => map,
                None => return Ok(RunOutcome::NoEligibleSamples),
            }
        }
        InputType::Tsoppi => tsoppi_dispositions(args, &paths, &allow_list, &catalog)?,
    };

    log::info!("Runner: Creating output files...");
    let plan = ExportPlan::build(&map, &paths.input_dir)?;
    plan.write_lists(&layout.export_list, &layout.skip_list)?;
    log::info!(
        "Runner: {} paths selected for export, {} skipped, {} ancestor directories ignored.",
        plan.export.len(),
        plan.skip.len(),
        plan.ignored
    );

    if !plan.has_exports() {
        log::info!("Runner: No files qualified for extraction. Exiting.");
        return Ok(RunOutcome::NothingQualified);
    }

    layout.script.write()?;

    let mut script_executed = false;
    if !args.generate_export_script_only {
        log::info!("Runner: Running the data extraction, packaging and encryption...");
        match script_runner.run(&layout.script.script_path) {
            Ok(status) if status.success() => script_executed = true,
            Ok(status) => {
                script_executed = true;
                log::warn!("Runner: The export script reported a failure ({status}).");
            }
            Err(err) => {
                log::warn!("Runner: The export script could not be executed: {err}.");
            }
        }
    }

    Ok(RunOutcome::Completed {
        exported: plan.export.len(),
        skipped: plan.skip.len(),
        ignored: plan.ignored,
        script_executed,
    })
}

/*
 * An unset prefix falls back to a second-resolution timestamp; a set one may
 * only contain alphanumerics and underscores.
 */
fn resolve_prefix(args: &CliArgs) -> Result<String> {
    match &args.output_file_prefix {
        None => Ok(timestamp_prefix()),
        Some(prefix) => {
            match prefix
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
            {
                Some(character) => Err(RunError::ForbiddenPrefixCharacter(character)),
                None => Ok(prefix.clone()),
            }
        }
    }
}

fn timestamp_prefix() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{:04}_{:02}_{:02}___{:02}_{:02}_{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/*
 * Converts every user-supplied path into the container view and checks its
 * existence, in the order the exit-code contract fixes: output directory,
 * password file, ID list, input directory.
 */
fn validate_paths(args: &CliArgs, mapping: &MountMapping) -> Result<ResolvedPaths> {
    let output_dir = convert(mapping, PathRole::OutputDirectory, &args.output_directory)?;
    ensure_output_directory(&output_dir)?;

    let password_file = convert(mapping, PathRole::GpgPasswordFile, &args.gpg_password_file)?;
    if !password_file.is_file() {
        return Err(RunError::MissingPasswordFile(password_file));
    }

    let id_list = convert(mapping, PathRole::SampleIdFile, &args.sample_id_list)?;
    if !id_list.is_file() {
        return Err(RunError::MissingIdListFile(id_list));
    }

    let input_dir = convert(mapping, PathRole::InputDirectory, &args.input_data_directory)?;
    if !input_dir.is_dir() {
        return Err(RunError::MissingInputDirectory(
            args.input_data_directory.clone(),
        ));
    }

    Ok(ResolvedPaths {
        output_dir_host: args.output_directory.clone(),
        output_dir,
        password_file_host: args.gpg_password_file.clone(),
        password_file,
        id_list_host: args.sample_id_list.clone(),
        id_list,
        input_dir_host: args.input_data_directory.clone(),
        input_dir,
    })
}

fn convert(mapping: &MountMapping, role: PathRole, host_path: &Path) -> Result<PathBuf> {
    mapping
        .to_container(host_path)
        .ok_or_else(|| RunError::OutsideMount {
            role,
            path: host_path.to_path_buf(),
            prefix: mapping.host_prefix().to_path_buf(),
        })
}

fn ensure_output_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    log::info!(
        "Runner: The specified output results directory couldn't be located within the container (path \"{}\"). Attempting to create it..",
        path.display()
    );
    fs::create_dir(path).map_err(RunError::OutputDirectoryCreation)?;
    log::info!("Runner: Output directory created.");
    Ok(())
}

/*
 * Names every output file for this run. The script file itself always lands
 * in the container-view output directory, but script-only runs embed
 * host-system paths so the script can be executed outside the container
 * later.
 */
fn resolve_output_layout(args: &CliArgs, paths: &ResolvedPaths, prefix: &str) -> OutputLayout {
    let tag = args.input_type.as_str();
    let container_named = |suffix: &str| paths.output_dir.join(format!("{prefix}_{tag}{suffix}"));

    let (view_label, script_out_dir, password_file, input_dir) = if args.generate_export_script_only
    {
        (
            "host_system",
            &paths.output_dir_host,
            &paths.password_file_host,
            &paths.input_dir_host,
        )
    } else {
        (
            "container",
            &paths.output_dir,
            &paths.password_file,
            &paths.input_dir,
        )
    };
    let script_named = |suffix: &str| script_out_dir.join(format!("{prefix}_{tag}{suffix}"));

    let script = ScriptSettings {
        script_path: container_named(&format!("_{view_label}_export.sh")),
        stdout_log: script_named(&format!("_{view_label}_export_stdout.log")),
        stderr_log: script_named(&format!("_{view_label}_export_stderr.log")),
        export_list: script_named("_files_to_export.txt"),
        password_file: password_file.clone(),
        archive: script_named(".tar.gpg"),
        archive_md5: script_named(".tar.gpg.md5"),
        file_md5: script_named("_individual_files.md5"),
        tar_parent_dir: input_dir.parent().unwrap_or(Path::new("/")).to_path_buf(),
        archive_level_md5: args.archive_level_md5sum,
        parallel: args.parallel_export_and_md5sum,
    };

    OutputLayout {
        log_file: container_named(".log"),
        export_list: container_named("_files_to_export.txt"),
        skip_list: container_named("_files_to_skip.txt"),
        inherited_errors: container_named("_inherited_errors.txt"),
        script,
    }
}

/* The overwrite gate covers the run log and the two path lists. */
fn outputs_already_exist(layout: &OutputLayout) -> bool {
    layout.log_file.exists() || layout.export_list.exists() || layout.skip_list.exists()
}

fn log_parameter_echo(args: &CliArgs, paths: &ResolvedPaths, prefix: &str) {
    log::info!(
        concat!(
            "Runner: Input parameter settings:\n",
            "        - input type: {input_type}\n",
            "        - output file prefix: {prefix}\n",
            "        - allow rewriting output: {rewrite}\n",
            "        - create archive-level md5sum file: {archive_md5}\n",
            "        - require InPreD sample ID nomenclature: {nomenclature}\n",
            "        - skip extraction script execution: {script_only}\n",
            "        - run gpg/tar and md5sum in parallel: {parallel}\n",
            "        - output directory ([host system]/[container]): [{output_host}]/[{output_cont}]\n",
            "        - input data directory ([host system]/[container]): [{input_host}]/[{input_cont}]\n",
            "        - GPG password file ([host system]/[container]): [{password_host}]/[{password_cont}]\n",
            "        - sample ID specification file ([host system]/[container]): [{id_host}]/[{id_cont}]"
        ),
        input_type = args.input_type,
        prefix = prefix,
        rewrite = args.rewrite_output,
        archive_md5 = args.archive_level_md5sum,
        nomenclature = args.require_inpred_nomenclature,
        script_only = args.generate_export_script_only,
        parallel = args.parallel_export_and_md5sum,
        output_host = paths.output_dir_host.display(),
        output_cont = paths.output_dir.display(),
        input_host = paths.input_dir_host.display(),
        input_cont = paths.input_dir.display(),
        password_host = paths.password_file_host.display(),
        password_cont = paths.password_file.display(),
        id_host = paths.id_list_host.display(),
        id_cont = paths.id_list.display(),
    );
}

/*
 * The LocalApp branch: inherited-error scan, sample sheet and run log
 * discovery, eligibility resolution, then classification of the whole root.
 * Returns `None` when the sheet yields no eligible samples.
 */
fn localapp_dispositions(
    args: &CliArgs,
    paths: &ResolvedPaths,
    layout: &OutputLayout,
    allow_list: &IdAllowList,
    catalog: &PatternCatalog,
) -> Result<Option<DispositionMap>> {
    log::info!("Runner: Processing the specified LocalApp output directory...");
    log::info!("Runner: Checking the directory content...");

    let logs_dir = paths.input_dir.join(localapp_logs::LOGS_SUBDIRECTORY);
    if !logs_dir.exists() {
        return Err(RunError::MissingLogsIntermediates);
    }
    let inherited = localapp_logs::collect_inherited_errors(&logs_dir);
    if inherited.is_empty() {
        log::info!("Runner: Found zero error lines in the LocalApp logs.");
    } else {
        log::info!(
            "Runner: Found {} error lines in the LocalApp logs. A copy of the error lines will be written into the inherited errors output file.",
            inherited.len()
        );
        write_inherited_errors(&layout.inherited_errors, &inherited)?;
    }

    let sheet_path = discovery::find_single(
        &paths.input_dir,
        &paths.input_dir_host,
        discovery::SAMPLE_SHEET_GLOB,
        "sample sheet",
    )
    .map_err(|source| RunError::Discovery {
        base_code: 13,
        source,
    })?;

    let run_log_path = discovery::find_single(
        &paths.input_dir,
        &paths.input_dir_host,
        discovery::RUN_LOG_GLOB,
        "log file",
    )
    .map_err(|source| RunError::Discovery {
        base_code: 14,
        source,
    })?;

    let samples =
        sample_sheet::parse_sample_sheet(&sheet_path, allow_list, args.require_inpred_nomenclature)?;
    if samples.eligible_count() == 0 {
        log::info!(
            "Runner: No samples suitable for extraction were identified within the processed sample sheet. Exiting."
        );
        return Ok(None);
    }
    log_sheet_summary(&samples);

    let from_bcl = localapp_logs::run_log_records_bcl_origin(&run_log_path)?;
    if from_bcl {
        log::info!("Runner: Expecting output for a LocalApp analysis starting from BCL files.");
    } else {
        log::info!("Runner: Expecting output for a LocalApp analysis starting from FASTQ files.");
    }

    let jobs = localapp_jobs(catalog, &samples, from_bcl)?;
    let snapshot = DirectorySnapshot::capture(&paths.input_dir);
    let (map, shortfalls) = classify(&snapshot, &jobs);
    for shortfall in &shortfalls {
        log_shortfall(&paths.input_dir, shortfall);
    }
    Ok(Some(map))
}

/*
 * The TSOPPI branch: every top-level entry is judged on its own. Non-
 * directories and directories with ineligible samples are recorded as Skip;
 * directories without a manifest are left out entirely; fully eligible
 * directories are classified against their own snapshot.
 */
fn tsoppi_dispositions(
    args: &CliArgs,
    paths: &ResolvedPaths,
    allow_list: &IdAllowList,
    catalog: &PatternCatalog,
) -> Result<DispositionMap> {
    log::info!("Runner: Processing the specified TSOPPI directory data...");
    log::info!("Runner: Checking the directory content...");

    let mut map = DispositionMap::new();
    for entry in top_level_entries(&paths.input_dir)? {
        if !entry.is_dir() {
            map.insert(entry, PathDisposition::Skip);
            continue;
        }

        let directory_name = entry
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!(
            "Runner: Checking sub-directory \"{directory_name}\" for sample extraction eligibility..."
        );

        let manifest_path = entry.join(patient_manifest::SAMPLE_LIST_FILENAME);
        if !manifest_path.is_file() {
            log::warn!(
                "Runner: No \"{}\" file found. The directory will be skipped.",
                patient_manifest::SAMPLE_LIST_FILENAME
            );
            continue;
        }
        log::info!(
            "Runner: File \"{}\" found, its content will be checked for eligible samples.",
            patient_manifest::SAMPLE_LIST_FILENAME
        );

        let manifest = patient_manifest::parse_patient_manifest(
            &manifest_path,
            allow_list,
            args.require_inpred_nomenclature,
        )?;
        if !manifest.all_samples_eligible() {
            log::info!(
                "Runner: Not all listed samples are eligible for extraction. The directory will be skipped."
            );
            map.insert(entry, PathDisposition::Skip);
            continue;
        }
        log::info!(
            "Runner: All listed samples are eligible for extraction. Processing the file list..."
        );

        let jobs = patient_jobs(catalog, &manifest)?;
        let snapshot = DirectorySnapshot::capture(&entry);
        let (patient_map, shortfalls) = classify(&snapshot, &jobs);
        for shortfall in &shortfalls {
            log_shortfall(&paths.input_dir, shortfall);
        }
        map.extend(patient_map);
    }

    Ok(map)
}

/* Top-level entries of the input directory, in lexicographic order. */
fn top_level_entries(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        match entry {
            Ok(found) => entries.push(found.path()),
            Err(err) => log::warn!(
                "Runner: Skipping an unreadable entry under \"{}\": {err}.",
                input_dir.display()
            ),
        }
    }
    entries.sort();
    Ok(entries)
}

fn log_sheet_summary(samples: &SheetSamples) {
    log::info!(
        "Runner: Sample sheet version {} detected.",
        samples.version
    );
    log::info!(
        "Runner: {} DNA samples with an ID match identified (sample ID [pair_ID] //matching_pattern):",
        samples.dna.len()
    );
    for (sample_id, sample) in &samples.dna {
        log::info!(
            "Runner: - \"{sample_id}\" [\"{}\"] //\"{}\"",
            sample.pair_id,
            sample.matched_entry
        );
    }
    log::info!(
        "Runner: {} RNA samples with an ID match identified (sample ID [pair_ID] //matching_pattern):",
        samples.rna.len()
    );
    for (sample_id, sample) in &samples.rna {
        log::info!(
            "Runner: - \"{sample_id}\" [\"{}\"] //\"{}\"",
            sample.pair_id,
            sample.matched_entry
        );
    }
}

/* Warnings carry the pattern as rendered under the input root, the original way. */
fn log_shortfall(input_root: &Path, shortfall: &MatchShortfall) {
    let location = format!("{}/{}", input_root.display(), shortfall.pattern);
    match &shortfall.sample_id {
        Some(sample_id) => log::warn!(
            "Runner: Too few matches found for the following path pattern for sample \"{sample_id}\": \"{location}\" ({} matches expected, {} found).",
            shortfall.expected,
            shortfall.found
        ),
        None => log::warn!(
            "Runner: Too few matches found for the following path pattern: \"{location}\" ({} matches expected, {} found).",
            shortfall.expected,
            shortfall.found
        ),
    }
}

fn write_inherited_errors(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
