// A minimal stderr logger for the `log` facade. Filtering happens through
// `log::set_max_level`, so every record that reaches us gets printed.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::Log;

#[derive(Debug)]
pub struct Logger(());

static LOGGER: Logger = Logger(());

impl Logger {
    /// Install the logger globally and set the level filter.
    pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let now = jiff::Timestamp::now();
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{now}|{}|{}:{line}: {}",
                    record.level(),
                    relative(file),
                    record.args()
                );
            }
            (Some(file), None) => {
                eprintln!("{now}|{}|{}: {}", record.level(), relative(file), record.args());
            }
            _ => eprintln!("{now}|{}: {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {}
}

fn relative(path: &str) -> &str {
    static CWD: LazyLock<Option<PathBuf>> = LazyLock::new(|| std::env::current_dir().ok());
    let Some(cwd) = CWD.as_deref() else { return path };
    Path::new(path)
        .strip_prefix(cwd)
        .ok()
        .and_then(Path::to_str)
        .unwrap_or(path)
}
