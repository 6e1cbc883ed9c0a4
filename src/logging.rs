use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type LogFile = Arc<Mutex<BufWriter<File>>>;

/// stderr とログファイルの両方へ書き出すロガー
#[derive(Clone, Default)]
pub struct Logger {
    file: Option<LogFile>,
}

impl Logger {
    /// `dir/{prefix}_YYYYmmdd_HHMMSS.log` を作成
    pub fn open<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<(Self, PathBuf)> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{}.log", prefix, ts));
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let logger = Self {
            file: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        };
        Ok((logger, path))
    }

    /// ファイルなし（テスト用）
    pub fn stderr_only() -> Self {
        Self { file: None }
    }

    pub fn write_line(&self, msg: &str) {
        eprintln!("{}", msg);
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{} {}", chrono::Local::now().format("%H:%M:%S%.3f"), msg);
                let _ = f.flush();
            }
        }
    }
}

#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)*) => {{
        $logger.write_line(&format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_receives_lines() {
        let dir = std::env::temp_dir().join(format!("talava_dash_log_{}", std::process::id()));
        let (logger, path) = Logger::open(&dir, "dash").unwrap();
        log!(logger, "[game] finished in {:.2}s", 12.5);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[game] finished in 12.50s"));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("dash_"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stderr_only_logger() {
        let logger = Logger::stderr_only();
        log!(logger, "no file {}", 1);
    }
}
