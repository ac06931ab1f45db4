//! Wire primitives shared by the reader and writer.

use byteorder::{ReadBytesExt, WriteBytesExt};
use dan_core::error::DanError;
use std::io::{self, Read, Write};

use crate::FormatResult;

/// Map a read failure, reporting truncation as a decode error
pub(crate) fn read_err(context: &str) -> impl FnOnce(io::Error) -> DanError + '_ {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DanError::decode(context, "unexpected end of data")
        } else {
            DanError::io(format!("Failed to read {}", context), e)
        }
    }
}

pub(crate) fn write_err(context: &str) -> impl FnOnce(io::Error) -> DanError + '_ {
    move |e| DanError::io(format!("Failed to write {}", context), e)
}

/// Read a `u8` length-prefixed UTF-8 string
pub(crate) fn read_string<R: Read>(r: &mut R, context: &str) -> FormatResult<String> {
    let len = r.read_u8().map_err(read_err(context))? as usize;
    let buf = read_bytes(r, len, context)?;
    String::from_utf8(buf).map_err(|e| DanError::decode(context, e))
}

/// Write a `u8` length-prefixed UTF-8 string
pub(crate) fn write_string<W: Write>(w: &mut W, s: &str, context: &str) -> FormatResult<()> {
    let len = u8::try_from(s.len()).map_err(|_| {
        DanError::encode(
            context,
            format!("'{}' is {} bytes, strings are limited to 255", s, s.len()),
        )
    })?;
    w.write_u8(len).map_err(write_err(context))?;
    w.write_all(s.as_bytes()).map_err(write_err(context))
}

/// Read exactly `len` bytes
pub(crate) fn read_bytes<R: Read>(r: &mut R, len: usize, context: &str) -> FormatResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(read_err(context))?;
    Ok(buf)
}
