//! Command file that makes a scale group forget every stored product.
//!
//! Each line reads `S#<scale_group>#<id>`; the scale deletes the product
//! with that id when it imports the file.

use crate::text::TextCodec;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Highest product id cleared by default.
pub const DEFAULT_MAX_ID: u32 = 9999;
/// Line terminator expected by the scale import.
pub const LINE_TERMINATOR: &str = "\r\n";

#[derive(Debug, Clone)]
pub struct ClearCommands<'a> {
    scale_group: &'a str,
    max_id: u32,
    terminator: &'a str,
    codec: TextCodec,
}

impl<'a> ClearCommands<'a> {
    pub fn new(scale_group: &'a str) -> Self {
        Self {
            scale_group,
            max_id: DEFAULT_MAX_ID,
            terminator: LINE_TERMINATOR,
            codec: TextCodec::default(),
        }
    }

    pub fn with_max_id(mut self, max_id: u32) -> Self {
        self.max_id = max_id;
        self
    }

    pub fn with_terminator(mut self, terminator: &'a str) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_codec(mut self, codec: TextCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Command lines for ids `1..=max_id`, without terminator.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.max_id).map(move |id| format!("S#{}#{id}", self.scale_group))
    }

    /// Fails with `InvalidData` if the scale group or the terminator has
    /// characters the codec cannot represent.
    fn check_encodable(&self) -> io::Result<()> {
        self.codec.encode(self.scale_group)?;
        self.codec.encode(self.terminator)?;
        Ok(())
    }

    /// Write every line followed by the terminator. Returns the line count.
    ///
    /// Nothing is written when the scale group cannot be encoded.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<u32> {
        self.check_encodable()?;
        let terminator = self.codec.encode(self.terminator)?;
        let mut count = 0;
        for line in self.lines() {
            out.write_all(&self.codec.encode(&line)?)?;
            out.write_all(&terminator)?;
            count += 1;
        }
        Ok(count)
    }

    /// Create (or truncate) `path` and fill it with the commands.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> io::Result<u32> {
        let path = path.as_ref();
        self.check_encodable()?;
        let mut out = BufWriter::new(File::create(path)?);
        let count = self.write_to(&mut out)?;
        out.flush()?;
        info!(
            "Wrote {count} clear commands for scale group {} to {}",
            self.scale_group,
            path.display()
        );
        Ok(count)
    }
}
