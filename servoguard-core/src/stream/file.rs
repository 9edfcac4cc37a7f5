//! File-based sample streaming
//!
//! Reads whitespace-separated `<time> <encoder> <pot>` records, one
//! per line, from a recorded data file:
//!
//! ```text
//! 0.001000 12 0
//! 0.002000 25 0
//! 0.003000 40 1
//! ```
//!
//! Field shapes are validated strictly before numeric parsing:
//! `time` is an unsigned decimal with at most one point, `encoder` a
//! signed integer, `pot` an unsigned integer. Any violation surfaces
//! as [`StreamError::Format`]; the stream does not skip bad lines,
//! because a gap in the record sequence would leave downstream filter
//! state meaningless.
//!
//! Reads are chunked (4 KiB) into a fixed buffer with a bounded line
//! buffer on top, so memory stays constant regardless of file size.

use std::fs::File;
use std::io::Read;

use super::{Stream, StreamError};
use crate::sample::ServoSample;

/// Statistics for file streaming.
#[derive(Debug, Default, Clone)]
pub struct FileStreamStats {
    /// Samples parsed successfully.
    pub samples_read: usize,
    /// Lines consumed from the file.
    pub lines_processed: usize,
    /// Lines rejected by field validation.
    pub parse_errors: usize,
    /// Bytes read from the file.
    pub bytes_read: usize,
}

/// Line-oriented sample stream over a recorded data file.
pub struct FileStream {
    /// File handle.
    file: File,
    /// Read buffer.
    buffer: [u8; 4096],
    /// Current position in buffer.
    buffer_pos: usize,
    /// Valid bytes in buffer.
    buffer_len: usize,
    /// Line assembly buffer.
    line_buffer: heapless::String<256>,
    /// Whether we've reached EOF.
    eof: bool,
    /// Statistics.
    stats: FileStreamStats,
}

impl FileStream {
    /// Open a data file for streaming.
    pub fn open(path: &str) -> Result<Self, StreamError<std::io::Error>> {
        let file = File::open(path).map_err(StreamError::Transport)?;

        Ok(Self {
            file,
            buffer: [0; 4096],
            buffer_pos: 0,
            buffer_len: 0,
            line_buffer: heapless::String::new(),
            eof: false,
            stats: FileStreamStats::default(),
        })
    }

    /// Get statistics.
    pub fn stats(&self) -> &FileStreamStats {
        &self.stats
    }

    /// Refill the chunk buffer from the file.
    fn refill_buffer(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        if self.eof {
            return Ok(false);
        }

        // Move remaining data to the beginning
        if self.buffer_pos < self.buffer_len {
            let remaining = self.buffer_len - self.buffer_pos;
            self.buffer.copy_within(self.buffer_pos..self.buffer_len, 0);
            self.buffer_len = remaining;
            self.buffer_pos = 0;
        } else {
            self.buffer_len = 0;
            self.buffer_pos = 0;
        }

        let bytes_read = self
            .file
            .read(&mut self.buffer[self.buffer_len..])
            .map_err(StreamError::Transport)?;

        if bytes_read == 0 {
            self.eof = true;
            return Ok(self.buffer_len > 0);
        }

        self.buffer_len += bytes_read;
        self.stats.bytes_read += bytes_read;
        Ok(true)
    }

    /// Assemble the next line into `line_buffer`.
    ///
    /// Returns false at end of file. A final line without a trailing
    /// newline is still delivered. Carriage returns are dropped so
    /// CRLF recordings parse the same as LF ones.
    fn read_line(&mut self) -> Result<bool, StreamError<std::io::Error>> {
        self.line_buffer.clear();

        loop {
            while self.buffer_pos < self.buffer_len {
                let byte = self.buffer[self.buffer_pos];
                self.buffer_pos += 1;

                if byte == b'\n' {
                    self.stats.lines_processed += 1;
                    return Ok(true);
                } else if byte != b'\r' {
                    if self.line_buffer.push(byte as char).is_err() {
                        return Err(StreamError::Overflow);
                    }
                }
            }

            if !self.refill_buffer()? {
                if !self.line_buffer.is_empty() {
                    self.stats.lines_processed += 1;
                    return Ok(true);
                }
                return Ok(false);
            }
        }
    }
}

impl Stream for FileStream {
    type Item = ServoSample;
    type Error = StreamError<std::io::Error>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        match self.read_line() {
            Ok(false) => Err(nb::Error::Other(StreamError::EndOfStream)),
            Ok(true) => match parse_line(self.line_buffer.as_str()) {
                Ok(sample) => {
                    self.stats.samples_read += 1;
                    Ok(sample)
                }
                Err(msg) => {
                    self.stats.parse_errors += 1;
                    Err(nb::Error::Other(StreamError::Format(msg)))
                }
            },
            Err(e) => Err(nb::Error::Other(e)),
        }
    }
}

/// Parse one record line. Fields past the third are ignored.
fn parse_line(line: &str) -> Result<ServoSample, &'static str> {
    let mut fields = line.split_whitespace();

    let time = parse_time(fields.next().ok_or("missing time field")?)?;
    let encoder = parse_encoder(fields.next().ok_or("missing encoder field")?)?;
    let pot = parse_pot(fields.next().ok_or("missing pot field")?)?;

    Ok(ServoSample::new(time, encoder, pot))
}

/// Unsigned decimal with at most one point, no sign.
fn parse_time(field: &str) -> Result<f32, &'static str> {
    let mut seen_point = false;
    for c in field.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            '.' => return Err("multiple decimal points in time field"),
            _ => return Err("bad character in time field"),
        }
    }

    field.parse::<f32>().map_err(|_| "unparseable time field")
}

/// Signed decimal integer.
fn parse_encoder(field: &str) -> Result<i32, &'static str> {
    let digits = field.strip_prefix('-').unwrap_or(field);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("bad character in encoder field");
    }

    field.parse::<i32>().map_err(|_| "encoder value out of range")
}

/// Unsigned decimal integer.
fn parse_pot(field: &str) -> Result<i32, &'static str> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err("bad character in pot field");
    }

    let value = field.parse::<u32>().map_err(|_| "pot value out of range")?;
    i32::try_from(value).map_err(|_| "pot value out of range")
}
