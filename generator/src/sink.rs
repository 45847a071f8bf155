//! Output sinks receiving generated units.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Accepts one generated declaration at a time.
pub trait OutputSink {
    fn accept(&mut self, name: &str, text: &str) -> io::Result<()>;
}

/// Writes each unit to `<dir>/<name>.java`, replacing an existing file of
/// the same name. Generated names are expected unique per run, so
/// last-writer-wins is acceptable.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputSink for FileSink {
    fn accept(&mut self, name: &str, text: &str) -> io::Result<()> {
        fs::write(self.dir.join(format!("{name}.java")), text)
    }
}

/// Collects units in memory, for tests and dry inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub units: Vec<(String, String)>,
}

impl OutputSink for MemorySink {
    fn accept(&mut self, name: &str, text: &str) -> io::Result<()> {
        self.units.push((name.to_string(), text.to_string()));
        Ok(())
    }
}
