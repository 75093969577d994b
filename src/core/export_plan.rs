/*
 * Turns a merged disposition map into the two flat output lists. Every line
 * is the processed root's directory name plus the root-relative path, joined
 * with "/" so the lists feed straight into `tar -C <root-parent> -T <list>`.
 * Ignored ancestor directories are counted but never listed.
 */
use crate::core::classifier::{DispositionMap, PathDisposition};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum PlanError {
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::OutsideRoot { path, root } => write!(
                f,
                "Provided result file path (\"{}\") does not include the specified directory prefix (\"{}\").",
                path.display(),
                root.display()
            ),
        }
    }
}

impl std::error::Error for PlanError {}

pub type Result<T> = std::result::Result<T, PlanError>;

/* The partition of all classified paths, in lexicographic path order. */
#[derive(Debug, Default)]
pub struct ExportPlan {
    pub export: Vec<String>,
    pub skip: Vec<String>,
    pub ignored: usize,
}

impl ExportPlan {
    /*
     * Partitions `map` against `input_root`. Fails if any classified path
     * does not live under the root.
     */
    pub fn build(map: &DispositionMap, input_root: &Path) -> Result<Self> {
        let root_name = input_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut plan = ExportPlan::default();
        for (path, disposition) in map {
            let relative = path
                .strip_prefix(input_root)
                .map_err(|_| PlanError::OutsideRoot {
                    path: path.clone(),
                    root: input_root.to_path_buf(),
                })?;
            match disposition {
                PathDisposition::Export => {
                    plan.export.push(prefixed_line(&root_name, relative));
                }
                PathDisposition::Skip => {
                    plan.skip.push(prefixed_line(&root_name, relative));
                }
                PathDisposition::Ignore => {
                    plan.ignored += 1;
                }
            }
        }
        Ok(plan)
    }

    pub fn has_exports(&self) -> bool {
        !self.export.is_empty()
    }

    /* Writes the export and skip lists, one path per line. */
    pub fn write_lists(&self, export_path: &Path, skip_path: &Path) -> io::Result<()> {
        write_lines(export_path, &self.export)?;
        write_lines(skip_path, &self.skip)?;
        Ok(())
    }
}

fn prefixed_line(root_name: &str, relative: &Path) -> String {
    let mut line = String::from(root_name);
    for component in relative.components() {
        line.push('/');
        line.push_str(&component.as_os_str().to_string_lossy());
    }
    line
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
