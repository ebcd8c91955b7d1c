use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

use once_cell::sync::OnceCell;

pub static LOGGER: OnceCell<Logger> = OnceCell::new();

/// Appends a formatted line to the log file. Does nothing until `init` ran.
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        {
            if let Some(logger) = $crate::logger::LOGGER.get() {
                logger.log(&format!($($arg)*));
            }
        }
    };
}

pub struct Logger {
    file: Mutex<File>,
}

impl Logger {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Logger {
            file: Mutex::new(file),
        })
    }

    pub fn log(&self, message: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{message}");
        }
    }
}

/// Opens the log file and installs it as the global logger
pub fn init(path: &Path) -> std::io::Result<()> {
    let logger = Logger::new(path)?;
    let _ = LOGGER.set(logger);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logger_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grove.log");
        let logger = Logger::new(&path).unwrap();
        logger.log("first");
        logger.log("second");

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
