use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

const ROTATE_SIZE: u64 = 5 * 1024 * 1024;
const ROTATE_KEEP: usize = 3;

/// Starts logging; `RUST_LOG` takes precedence over `level`.
///
/// The returned handle must outlive all logging.
pub fn init_logging(level: &str, file: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(level)?;
    let handle = match file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let basename = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("scrape-cli")
                .to_string();
            logger
                .log_to_file(FileSpec::default().directory(directory).basename(basename))
                .rotate(
                    Criterion::Size(ROTATE_SIZE),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(ROTATE_KEEP),
                )
                .start()?
        }
        None => logger.log_to_stderr().start()?,
    };
    Ok(handle)
}
