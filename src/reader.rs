//! Buffered Reader wrapper, for plain or gzip compressed telemetry.
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

use crate::Error;

/// [BufferedReader] gives [BufRead] access to GPSD telemetry files,
/// whether they are plain text or gzip compressed.
#[derive(Debug)]
pub enum BufferedReader {
    /// Readable JSON lines
    Plain(BufReader<File>),
    /// gzip compressed JSON lines
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    Gzip(BufReader<GzDecoder<File>>),
}

impl BufferedReader {
    /// Opens given file. Files terminated by `.gz` are
    /// decompressed on the fly.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fd = File::open(path)?;
        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if gzip {
            #[cfg(feature = "flate2")]
            {
                Ok(Self::Gzip(BufReader::new(GzDecoder::new(fd))))
            }
            #[cfg(not(feature = "flate2"))]
            {
                Err(Error::GzipNotSupported)
            }
        } else {
            Ok(Self::Plain(BufReader::new(fd)))
        }
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(h) => h.read(buf),
            #[cfg(feature = "flate2")]
            Self::Gzip(h) => h.read(buf),
        }
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        match self {
            Self::Plain(h) => h.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::Gzip(h) => h.fill_buf(),
        }
    }
    fn consume(&mut self, s: usize) {
        match self {
            Self::Plain(h) => h.consume(s),
            #[cfg(feature = "flate2")]
            Self::Gzip(h) => h.consume(s),
        }
    }
}
