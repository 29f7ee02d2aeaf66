use std::{fs::{self, OpenOptions}, io::Write, path::Path};
use chrono::Local;

pub trait Logger: Send + Sync {
    fn log(&mut self, message: &str);
    fn debug_log(&mut self, message: &str);
}

#[derive(Debug)]
pub struct FileLogger {
    log_file: String,
    debug: bool,
}

impl FileLogger {
    pub fn new(log_file: &str, debug: bool) -> std::io::Result<Self> {
        // Create log directory if it doesn't exist
        if let Some(parent) = Path::new(log_file).parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(FileLogger {
            log_file: log_file.to_string(),
            debug,
        })
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(file, "{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.write_to_file(message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            if let Err(e) = self.write_to_file(&format!("[DEBUG] {}", message)) {
                eprintln!("Failed to write debug log: {}", e);
            }
        }
    }
}

/// Progress on stderr so stdout stays clean for `--print-config`.
#[derive(Debug)]
pub struct ConsoleLogger {
    debug: bool,
}

impl ConsoleLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Logger for ConsoleLogger {
    fn log(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            eprintln!("[DEBUG] {}", message);
        }
    }
}

// MultiLogger allows logging to multiple destinations
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn new(loggers: Vec<Box<dyn Logger>>) -> Self {
        Self { loggers }
    }
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.log(message);
        }
    }

    fn debug_log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.debug_log(message);
        }
    }
}

#[cfg(test)]
pub struct MemoryLogger {
    pub logs: Vec<String>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn new() -> Self {
        Self { logs: Vec::new() }
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn debug_log(&mut self, message: &str) {
        self.logs.push(format!("DEBUG: {}", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_logger_skips_debug_lines_unless_enabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/bootstrap.log");
        let path = path.to_str().unwrap();

        let mut logger = FileLogger::new(path, false).unwrap();
        logger.log("generated assets");
        logger.debug_log("hidden");

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("generated assets"));
        assert!(!contents.contains("hidden"));
    }

    #[test]
    fn multi_logger_fans_out() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.log");
        let second = dir.path().join("b.log");
        let mut logger = MultiLogger::new(vec![
            Box::new(FileLogger::new(first.to_str().unwrap(), true).unwrap()),
            Box::new(FileLogger::new(second.to_str().unwrap(), true).unwrap()),
        ]);
        logger.debug_log("both");

        for path in [first, second] {
            assert!(fs::read_to_string(path).unwrap().contains("[DEBUG] both"));
        }
    }
}
