use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;

/// Output name for an input identifier: everything after the last `/`, plus `.edgy`.
///
/// Returns `None` when nothing is left after the last separator. Backslashes are not
/// treated as separators.
pub fn output_file_name(input: &str) -> Option<String> {
    let base = input.rsplit('/').next().unwrap_or(input);
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}.edgy"))
}

/// Scoped writer for one output file.
///
/// The file is closed when the sink goes away. A sink dropped before [`EdgySink::commit`]
/// removes what it wrote, so failures never leave a truncated container behind.
pub struct EdgySink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl EdgySink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self::from_file(path, file))
    }

    /// Wrap an already open handle; `path` is what gets removed on failure.
    fn from_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            writer: Some(BufWriter::new(file)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, keeping it on disk.
    ///
    /// The writer stays owned until both flush and sync succeed, so a failure here
    /// still removes the file on drop.
    pub fn commit(mut self) -> Result<PathBuf> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        self.writer = None;
        Ok(std::mem::take(&mut self.path))
    }
}

impl Write for EdgySink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(std::io::Error::other("edgy sink already committed")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EdgySink {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(
                    "failed to remove incomplete output {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_directories_only() {
        assert_eq!(output_file_name("Arial").as_deref(), Some("Arial.edgy"));
        assert_eq!(
            output_file_name("assets/ui/button.png").as_deref(),
            Some("button.png.edgy")
        );
        assert_eq!(
            output_file_name("/usr/share/fonts/DejaVuSans.ttf").as_deref(),
            Some("DejaVuSans.ttf.edgy")
        );
        assert_eq!(output_file_name("fonts/"), None);
        assert_eq!(output_file_name(""), None);
    }

    #[test]
    fn committed_sink_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.edgy");
        let mut sink = EdgySink::create(&path).unwrap();
        sink.write_all(b"edgy").unwrap();
        let written = sink.commit().unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"edgy");
    }

    #[test]
    fn dropped_sink_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.edgy");
        {
            let mut sink = EdgySink::create(&path).unwrap();
            sink.write_all(b"half").unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn failed_commit_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.edgy");
        std::fs::write(&path, b"").unwrap();

        // A read-only handle accepts buffered writes but fails on flush.
        let file = File::open(&path).unwrap();
        let mut sink = EdgySink::from_file(path.clone(), file);
        sink.write_all(b"edgy").unwrap();
        assert!(matches!(sink.commit(), Err(crate::EdgyError::Io(_))));
        assert!(!path.exists());
    }
}
