/*
 * Logging setup. Messages go to stdout from startup on; a copy goes into the
 * run log file as soon as its path is known. simplelog wires its sinks once
 * at initialization, so the file half writes through `LateFileSink`: a
 * handle that discards everything until `attach` points it at the run log,
 * mid-run, after the overwrite gate has passed.
 */
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use time::macros::format_description;

/*
 * Cloneable write target whose destination file can be attached after the
 * logger is already running. Writes before attachment are silently dropped;
 * afterwards they go straight to the file (unbuffered, so nothing is lost
 * on process exit).
 */
#[derive(Debug, Clone, Default)]
pub struct LateFileSink {
    target: Arc<Mutex<Option<File>>>,
}

impl LateFileSink {
    pub fn new() -> Self {
        LateFileSink::default()
    }

    /*
     * Points the sink at `path`. Truncates an existing file unless `append`
     * is requested.
     */
    pub fn attach(&self, path: &Path, append: bool) -> io::Result<()> {
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)?
        } else {
            File::create(path)?
        };
        let mut guard = self.lock_target();
        *guard = Some(file);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.lock_target().is_some()
    }

    fn lock_target(&self) -> std::sync::MutexGuard<'_, Option<File>> {
        /* A poisoned lock only means a logging thread panicked; keep going. */
        self.target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for LateFileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.lock_target();
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.lock_target();
        match guard.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/*
 * Initializes the combined terminal plus late-attach file logger and hands
 * back the sink to attach once the run log path is settled.
 */
pub fn init() -> LateFileSink {
    let sink = LateFileSink::new();

    let mut builder = ConfigBuilder::new();
    builder.set_time_format_custom(format_description!(
        "[year]-[month]-[day]_[hour]:[minute]:[second]"
    ));
    /* Falls back to UTC timestamps when the local offset is indeterminate. */
    let _ = builder.set_time_offset_to_local();
    let config = builder.build();

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Info,
            config.clone(),
            TerminalMode::Stdout,
            ColorChoice::Never,
        ),
        WriteLogger::new(LevelFilter::Info, config, sink.clone()),
    ];
    if CombinedLogger::init(loggers).is_err() {
        /* Another logger is already installed; keep it and carry on. */
        log::warn!("Logging: Logger already initialized, keeping the existing one.");
    }

    sink
}
