// Append-only output file for discovered links

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use urlextractor_scanner::fetcher::normalize_seed;
use urlextractor_scanner::{DiscoveredLink, LinkSink};

/// Default output file for a seed: its host without a leading `www.`, plus `.txt`.
pub fn default_output_path(seed: &str) -> PathBuf {
    normalize_seed(seed)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_string()))
        .map(|host| {
            let host = host.strip_prefix("www.").unwrap_or(&host);
            PathBuf::from(format!("{}.txt", host))
        })
        .unwrap_or_else(|| PathBuf::from("output.txt"))
}

/// One URL per line, appended and flushed as each link arrives.
///
/// The file is opened on `start`, so a crawl that never gets past its seed
/// leaves no file behind.
pub struct OutputFile {
    path: PathBuf,
    writer: Option<LineWriter<File>>,
    written: usize,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn open(&mut self) -> io::Result<&mut LineWriter<File>> {
        if self.writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.writer = Some(LineWriter::new(file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output file not open"))
    }
}

impl LinkSink for OutputFile {
    fn start(&mut self) -> io::Result<()> {
        self.open().map(|_| ())
    }

    fn emit(&mut self, link: &DiscoveredLink) -> io::Result<()> {
        let writer = self.open()?;
        writeln!(writer, "{}", link.url)?;
        self.written += 1;
        Ok(())
    }
}
