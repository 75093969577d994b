/*
 * Inspection of the LocalApp pipeline's own log output. Two concerns live
 * here: collecting error lines the upstream analysis already produced (so
 * they can be handed over next to the exported data), and detecting whether
 * the analysis started from BCL files, which decides if the BCL-only pattern
 * categories apply.
 */
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/* Name of the sub-directory holding the pipeline's per-step logs. */
pub const LOGS_SUBDIRECTORY: &str = "Logs_Intermediates";

/* Literal marker written by the FASTQ-generation step of BCL-origin runs. */
pub const BCL_ORIGIN_MARKER: &str = "stepName \"FastqGeneration\"";

/* A whole word "error", any capitalization. "errors" and "error_rate" do not count. */
static ERROR_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\berror\b").expect("the error line pattern is valid")
});

/*
 * Recursively scans the log files under `logs_dir` (files with a ".log"
 * extension) and returns every line carrying an error marker, in a
 * deterministic walk order. Unreadable files are logged and skipped.
 */
pub fn collect_inherited_errors(logs_dir: &Path) -> Vec<String> {
    let mut error_lines = Vec::new();
    let walker = WalkDir::new(logs_dir).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!(
                    "LocalAppLogs: Skipping an unreadable entry under \"{}\": {err}.",
                    logs_dir.display()
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("log") {
            continue;
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!(
                    "LocalAppLogs: The log file \"{}\" could not be read: {err}.",
                    path.display()
                );
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        for line in text.lines() {
            if ERROR_LINE_PATTERN.is_match(line) {
                error_lines.push(line.to_string());
            }
        }
    }
    error_lines
}

/* True when the run log records the FASTQ-generation step, i.e. a BCL start. */
pub fn run_log_records_bcl_origin(run_log: &Path) -> std::io::Result<bool> {
    let bytes = fs::read(run_log)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.contains(BCL_ORIGIN_MARKER))
}
