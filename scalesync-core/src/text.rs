//! Text-mode transcoding for files fetched from the scale server.

use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;
use std::fmt;
use std::io;

/// Character encoding used for text transfers and generated command files.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    encoding: &'static Encoding,
}

impl TextCodec {
    pub const fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Look up a codec by label (`cp1252`, `utf-8`, `latin1`, ...).
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self::new)
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Fails with `InvalidData` when `text` has characters the encoding
    /// cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> io::Result<Cow<'a, [u8]>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("cannot represent '{text}' in {}", self.name()),
            ));
        }
        Ok(bytes)
    }

    /// Re-encode `raw` line by line, ending every line with `\n`.
    ///
    /// Lines end at `\n`; a `\r` right before it is dropped. A last line
    /// without terminator is kept. Bytes that are not valid in the encoding
    /// give `InvalidData`.
    pub fn normalize_lines(&self, raw: &[u8]) -> io::Result<Vec<u8>> {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(raw);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid {} sequence", self.name()),
            ));
        }
        let mut out = Vec::with_capacity(raw.len());
        for line in text.split_inclusive('\n') {
            let line = line
                .strip_suffix("\r\n")
                .or_else(|| line.strip_suffix('\n'))
                .unwrap_or(line);
            out.extend_from_slice(&self.encode(line)?);
            out.push(b'\n');
        }
        Ok(out)
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::new(WINDOWS_1252)
    }
}

impl fmt::Debug for TextCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextCodec").field(&self.name()).finish()
    }
}
