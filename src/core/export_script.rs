/*
 * Generation and execution of the packaging script. The script is plain
 * bash: it tars the export list, pipes the archive through gpg symmetric
 * encryption, and produces md5 checksums, either per exported file or over
 * the finished archive. All heavy lifting stays in external tools; this
 * module only renders the text and, on request, launches `bash`.
 */
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Everything the rendered script embeds. The paths are taken verbatim, so
/// the caller decides whether the script speaks host-system or container
/// paths.
#[derive(Debug, Clone)]
pub struct ScriptSettings {
    /// Where the script file itself is written (always container view).
    pub script_path: PathBuf,
    pub stdout_log: PathBuf,
    pub stderr_log: PathBuf,
    pub export_list: PathBuf,
    pub password_file: PathBuf,
    pub archive: PathBuf,
    pub archive_md5: PathBuf,
    pub file_md5: PathBuf,
    /// Directory `tar -C` changes into; the export list is relative to it.
    pub tar_parent_dir: PathBuf,
    pub archive_level_md5: bool,
    pub parallel: bool,
}

impl ScriptSettings {
    /// Renders the full script text.
    ///
    /// With `parallel` set and file-level checksumming in effect, the
    /// tar/gpg pipeline and the checksum loop run as background jobs joined
    /// by a final `wait`. Archive-level checksumming depends on the finished
    /// archive, so it always runs sequentially and the flag is ignored.
    pub fn render(&self) -> String {
        let ampersand = if self.parallel && !self.archive_level_md5 {
            " &"
        } else {
            ""
        };

        let mut script = String::new();
        script.push_str("#!/bin/bash\n");
        script.push_str("date\n");
        script.push_str("echo \"setting up dedicated stdout and stderr log files..\"\n");
        let _ = writeln!(script, "exec >  >(tee -i {})", self.stdout_log.display());
        let _ = writeln!(script, "exec 2> >(tee -i {} >&2)", self.stderr_log.display());
        script.push_str("sleep 2\n");
        script.push_str("echo \"packaging and encrypting selected files..\"\n");
        let _ = writeln!(
            script,
            "if [ -f {0} ]; then rm {0} ; fi",
            self.archive.display()
        );
        let _ = writeln!(
            script,
            "tar -C {} -T {} -c | gpg -c --passphrase-file {} --batch --cipher-algo aes256 -o {}{}",
            self.tar_parent_dir.display(),
            self.export_list.display(),
            self.password_file.display(),
            self.archive.display(),
            ampersand
        );
        if self.archive_level_md5 {
            script.push_str("echo \"creating archive-level md5 checksums..\"\n");
            let _ = writeln!(
                script,
                "md5sum {} > {}",
                self.archive.display(),
                self.archive_md5.display()
            );
        } else {
            script.push_str("echo \"creating file-level md5 checksums..\"\n");
            let _ = writeln!(script, "cd {}", self.tar_parent_dir.display());
            let _ = writeln!(
                script,
                "cat {} | while read path_line; do if [ -f ${{path_line}} ]; then md5sum ${{path_line}}; fi; done > {}{}",
                self.export_list.display(),
                self.file_md5.display(),
                ampersand
            );
            script.push_str("cd - > /dev/null\n");
        }
        if !ampersand.is_empty() {
            script.push_str("wait\n");
        }
        script.push_str("date\n");
        script
    }

    /// Writes the rendered script to `script_path`.
    pub fn write(&self) -> io::Result<()> {
        fs::write(&self.script_path, self.render())
    }
}

/// Seam for launching the generated script, so orchestration tests can run
/// without spawning processes.
pub trait ScriptRunnerOperations: Send + Sync {
    fn run(&self, script_path: &Path) -> io::Result<ExitStatus>;
}

/// Production runner: `bash <script>`, waiting for completion.
#[derive(Debug, Default)]
pub struct CoreScriptRunner;

impl CoreScriptRunner {
    pub fn new() -> Self {
        CoreScriptRunner
    }
}

impl ScriptRunnerOperations for CoreScriptRunner {
    fn run(&self, script_path: &Path) -> io::Result<ExitStatus> {
        Command::new("bash").arg(script_path).status()
    }
}
