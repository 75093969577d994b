/*
 * Command-line surface. The long option names keep the original underscored
 * spelling (e.g. `--input_data_directory`) so existing pipeline wrappers can
 * drive this binary unchanged.
 */
use crate::core::InputType;
use crate::core::catalog::DEFAULT_CATALOG_PATH;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONTAINER_MOUNTING_DIRECTORY: &str = "/inpred/data";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sample_packer",
    version,
    about = "Extract data of specified patients (from LocalApp or TSOPPI output)."
)]
pub struct CliArgs {
    /// Absolute path to a LocalApp or TSOPPI output directory (from which
    /// data should be extracted).
    #[arg(long = "input_data_directory")]
    pub input_data_directory: PathBuf,

    /// Absolute path to a text file specifying a password that should be
    /// utilized for encryption of the extracted data. The file should not
    /// contain anything except for the password on the first line.
    #[arg(long = "gpg_password_file")]
    pub gpg_password_file: PathBuf,

    /// Absolute path to a tab-separated file specifying IDs of samples whose
    /// data should be extracted (columns "matching_method" and "target_ID").
    #[arg(long = "sample_ID_list")]
    pub sample_id_list: PathBuf,

    /// Absolute path to the directory in which all of the output files
    /// should be stored. If not existing, the directory will be created.
    #[arg(long = "output_directory")]
    pub output_directory: PathBuf,

    /// Type of TSO500 solid results that should serve as input for data
    /// extraction.
    #[arg(long = "input_type", value_parser = InputType::from_arg)]
    pub input_type: InputType,

    /// Absolute path to the host system mounting directory. The specified
    /// directory should include all input and output file paths in its
    /// directory tree.
    #[arg(long = "host_system_mounting_directory")]
    pub host_system_mounting_directory: PathBuf,

    /// Prefix used for all output files. If not set, a time-stamp based
    /// prefix will be generated. Only alphanumeric characters and
    /// underscores are allowed.
    #[arg(long = "output_file_prefix")]
    pub output_file_prefix: Option<String>,

    /// Only generate a script for the required data export (encryption and
    /// packaging), do not run the script.
    #[arg(long = "generate_export_script_only")]
    pub generate_export_script_only: bool,

    /// Run gpg/tar and md5sum in parallel.
    #[arg(long = "parallel_export_and_md5sum")]
    pub parallel_export_and_md5sum: bool,

    /// Require that all input IDs are compatible with the InPreD sample
    /// nomenclature.
    #[arg(long = "require_inpred_nomenclature")]
    pub require_inpred_nomenclature: bool,

    /// Create the md5sum on the final tar.gpg archive instead of creating it
    /// on individual files.
    #[arg(long = "archive_level_md5sum")]
    pub archive_level_md5sum: bool,

    /// Allow rewriting already existing output files.
    #[arg(long = "rewrite_output")]
    pub rewrite_output: bool,

    /// Append to an already existing run log file instead of truncating it.
    #[arg(long = "append_log")]
    pub append_log: bool,

    /// Container's inner mounting point. The host system mounting directory
    /// prefix is replaced by this path in all input and output file paths
    /// (this parameter shouldn't be changed during regular use).
    #[arg(
        long = "container_mounting_directory",
        default_value = DEFAULT_CONTAINER_MOUNTING_DIRECTORY
    )]
    pub container_mounting_directory: PathBuf,

    /// Container-view path of the extraction path pattern file.
    #[arg(long = "extraction_patterns_file", default_value = DEFAULT_CATALOG_PATH)]
    pub extraction_patterns_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn required_args() -> Vec<&'static str> {
        vec![
            "sample_packer",
            "--input_data_directory",
            "/mnt/data/run42",
            "--gpg_password_file",
            "/mnt/data/pw.txt",
            "--sample_ID_list",
            "/mnt/data/ids.tsv",
            "--output_directory",
            "/mnt/data/out",
            "--input_type",
            "LocalApp",
            "--host_system_mounting_directory",
            "/mnt/data",
        ]
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_required_arguments_and_defaults() {
        let args = CliArgs::try_parse_from(required_args()).unwrap();

        assert_eq!(args.input_data_directory, PathBuf::from("/mnt/data/run42"));
        assert_eq!(args.input_type, InputType::LocalApp);
        assert_eq!(
            args.container_mounting_directory,
            PathBuf::from(DEFAULT_CONTAINER_MOUNTING_DIRECTORY)
        );
        assert_eq!(
            args.extraction_patterns_file,
            PathBuf::from(DEFAULT_CATALOG_PATH)
        );
        assert_eq!(args.output_file_prefix, None);
        assert!(!args.generate_export_script_only);
        assert!(!args.parallel_export_and_md5sum);
        assert!(!args.require_inpred_nomenclature);
        assert!(!args.archive_level_md5sum);
        assert!(!args.rewrite_output);
        assert!(!args.append_log);
    }

    #[test]
    fn test_parse_flags_and_overrides() {
        let mut argv = required_args();
        argv.extend([
            "--output_file_prefix",
            "run42",
            "--generate_export_script_only",
            "--parallel_export_and_md5sum",
            "--archive_level_md5sum",
            "--rewrite_output",
            "--append_log",
            "--container_mounting_directory",
            "/inpred/elsewhere",
        ]);

        let args = CliArgs::try_parse_from(argv).unwrap();

        assert_eq!(args.output_file_prefix.as_deref(), Some("run42"));
        assert!(args.generate_export_script_only);
        assert!(args.parallel_export_and_md5sum);
        assert!(args.archive_level_md5sum);
        assert!(args.rewrite_output);
        assert!(args.append_log);
        assert_eq!(
            args.container_mounting_directory,
            PathBuf::from("/inpred/elsewhere")
        );
    }

    #[test]
    fn test_parse_rejects_missing_required_argument() {
        let mut argv = required_args();
        argv.drain(1..3); // drop --input_data_directory and its value
        assert!(CliArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_input_type() {
        let mut argv = required_args();
        let position = argv.iter().position(|a| *a == "LocalApp").unwrap();
        argv[position] = "DRAGEN";
        assert!(CliArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_parse_accepts_tsoppi_input_type() {
        let mut argv = required_args();
        let position = argv.iter().position(|a| *a == "LocalApp").unwrap();
        argv[position] = "TSOPPI";

        let args = CliArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.input_type, InputType::Tsoppi);
    }
}
