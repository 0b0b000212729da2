//! Blocking source → sink transfer with a size-tiered buffer.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::time::Instant;

use tracing::debug;

use crate::constants::{DEFAULT_BUFFER_SIZE, GB, LARGE_BUFFER_SIZE, MB, MEDIUM_BUFFER_SIZE};
use crate::telemetry::{TransferCounters, TransferSnapshot};
use crate::types::StreamError;

/// Pick a read buffer size from the (estimated) number of bytes to move.
pub fn buffer_size_for(size: u64) -> usize {
    if size >= GB {
        LARGE_BUFFER_SIZE
    } else if size >= MB {
        MEDIUM_BUFFER_SIZE
    } else {
        DEFAULT_BUFFER_SIZE
    }
}

/// Buffer size for a seekable source from its remaining length (`len - position`).
///
/// Falls back to the default buffer when the size cannot be queried. Errors only
/// if the starting position cannot be restored.
pub fn buffer_size_for_seekable<S: Seek>(source: &mut S) -> io::Result<usize> {
    let position = match source.stream_position() {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "source position unknown, using default buffer");
            return Ok(DEFAULT_BUFFER_SIZE);
        }
    };
    let end = match source.seek(SeekFrom::End(0)) {
        Ok(end) => end,
        Err(e) => {
            debug!(error = %e, "source size unknown, using default buffer");
            return Ok(DEFAULT_BUFFER_SIZE);
        }
    };
    if end != position {
        source.seek(SeekFrom::Start(position))?;
    }
    Ok(buffer_size_for(end.saturating_sub(position)))
}

/// Write the whole buffer, retrying short writes until nothing is left.
///
/// A sink that accepts zero bytes is reported as `WriteZero` instead of spinning.
pub fn fully_write<W: Write + ?Sized>(
    buf: &[u8],
    sink: &mut W,
    counters: &mut TransferCounters,
) -> io::Result<()> {
    let mut offset = 0;
    while offset < buf.len() {
        match sink.write(&buf[offset..]) {
            Ok(0) => {
                return Err(io::Error::new(ErrorKind::WriteZero, "sink accepted zero bytes"));
            }
            Ok(n) => {
                counters.add_write(n);
                offset += n;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn read_some<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match source.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn copy_loop<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> Result<TransferSnapshot, StreamError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let started = Instant::now();
    let mut counters = TransferCounters::default();
    let mut buffer = vec![0u8; buffer_size];

    loop {
        let n = read_some(source, &mut buffer)?;
        counters.add_read(n);
        if n == 0 {
            break;
        }
        fully_write(&buffer[..n], sink, &mut counters)?;
    }
    sink.flush()?;

    let snapshot = TransferSnapshot::from(&counters, buffer_size, started.elapsed());
    debug!(
        bytes = snapshot.bytes_transferred,
        reads = snapshot.read_calls,
        writes = snapshot.write_calls,
        buffer_size,
        "transfer complete"
    );
    Ok(snapshot)
}

/// Transfer everything from `source` to `sink`.
///
/// `estimated_size` sizes the buffer; without it the default buffer is used.
pub fn transfer<R, W>(mut source: R, mut sink: W, estimated_size: Option<u64>) -> Result<TransferSnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let buffer_size = estimated_size.map(buffer_size_for).unwrap_or(DEFAULT_BUFFER_SIZE);
    copy_loop(&mut source, &mut sink, buffer_size)
}

/// Like [`transfer`], but a seekable source reports its own remaining size when
/// no estimate is given.
pub fn transfer_seekable<R, W>(mut source: R, mut sink: W, estimated_size: Option<u64>) -> Result<TransferSnapshot, StreamError>
where
    R: Read + Seek,
    W: Write,
{
    let buffer_size = match estimated_size {
        Some(size) => buffer_size_for(size),
        None => buffer_size_for_seekable(&mut source)?,
    };
    copy_loop(&mut source, &mut sink, buffer_size)
}
