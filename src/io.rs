//! Input/output helpers: plain or gzip files, or the standard streams for `-`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::errors::Result;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Opens `path` for buffered reading, decompressing when it ends in `.gz`.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::with_capacity(2 << 20, io::stdin())));
    }

    let file = File::open(path)?;

    if is_gzip(path) {
        let decoder = MultiGzDecoder::new(file);
        // 2 MiB buffer
        Ok(Box::new(BufReader::with_capacity(2 << 20, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(2 << 20, file)))
    }
}

/// Buffered output sink. Call [`Output::finish`] once everything is written: it flushes
/// the buffer and, for gzip, writes the trailer, reporting any failure.
pub enum Output {
    Stdout(BufWriter<io::Stdout>),
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

impl Output {
    pub fn finish(self) -> Result<()> {
        match self {
            Output::Stdout(mut w) => w.flush()?,
            Output::Plain(mut w) => w.flush()?,
            Output::Gzip(w) => {
                let encoder = w.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
            }
        }
        Ok(())
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Plain(w) => w.write(buf),
            Output::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Plain(w) => w.flush(),
            Output::Gzip(w) => w.flush(),
        }
    }
}

/// Creates a buffered writer for `path` (stdout when `None` or `-`), compressing when it ends in `.gz`.
pub fn create_writer(path: Option<&Path>) -> Result<Output> {
    let path = match path {
        Some(p) if !is_stdio(p) => p,
        _ => return Ok(Output::Stdout(BufWriter::with_capacity(1 << 20, io::stdout()))),
    };

    let file = File::create(path)?;

    if is_gzip(path) {
        // level 1: output is intermediate, speed over ratio
        let encoder = GzEncoder::new(file, Compression::new(1));
        Ok(Output::Gzip(BufWriter::with_capacity(4 << 20, encoder)))
    } else {
        Ok(Output::Plain(BufWriter::with_capacity(4 << 20, file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fa.gz");
        let mut writer = create_writer(Some(path.as_path())).unwrap();
        writer.write_all(b">r1\nACGT\n").unwrap();
        writer.finish().unwrap();

        let mut raw = Vec::new();
        File::open(&path).unwrap().read_to_end(&mut raw).unwrap();
        assert_eq!(&raw[..2], &[0x1f_u8, 0x8b]);

        let mut text = String::new();
        open_reader(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, ">r1\nACGT\n");
    }

    #[test]
    fn test_finish_writes_gzip_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inserts.fa.gz");
        let payload = b">m1/1/ccs\nACGTACGTAAAA\n";
        let mut writer = create_writer(Some(path.as_path())).unwrap();
        writer.write_all(payload).unwrap();
        writer.finish().unwrap();

        // gzip members end with CRC32 then ISIZE (uncompressed length, little endian)
        let raw = std::fs::read(&path).unwrap();
        let isize_bytes: [u8; 4] = raw[raw.len() - 4..].try_into().unwrap();
        assert_eq!(u32::from_le_bytes(isize_bytes) as usize, payload.len());
    }

    #[test]
    fn test_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let mut text = String::new();
        open_reader(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "a,b\n");

        let out = dir.path().join("out.fa");
        let mut writer = create_writer(Some(out.as_path())).unwrap();
        writer.write_all(b">r\nA\n").unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), ">r\nA\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_reader(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(crate::errors::InsertError::Io(_))));
    }
}
