//! Future-style source → sink transfer.
//!
//! Each read and write is an `.await` inside one loop, so completions are resumed
//! by the runtime and the stack never grows with the number of chunks.

use std::io::{self, ErrorKind};
use std::time::Instant;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use streaming_core::constants::DEFAULT_BUFFER_SIZE;
use streaming_core::telemetry::{TransferCounters, TransferSnapshot};
use streaming_core::transfer::buffer_size_for;
use streaming_core::types::StreamError;

/// Write the whole buffer, awaiting and retrying short writes.
pub async fn fully_write_async<W>(buf: &[u8], sink: &mut W, counters: &mut TransferCounters) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut offset = 0;
    while offset < buf.len() {
        match sink.write(&buf[offset..]).await {
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

async fn copy_loop<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> Result<TransferSnapshot, StreamError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let started = Instant::now();
    let mut counters = TransferCounters::default();
    let mut buffer = vec![0u8; buffer_size];

    loop {
        let n = match source.read(&mut buffer).await {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        counters.add_read(n);
        if n == 0 {
            break;
        }
        fully_write_async(&buffer[..n], sink, &mut counters).await?;
    }
    sink.flush().await?;

    let snapshot = TransferSnapshot::from(&counters, buffer_size, started.elapsed());
    debug!(
        bytes = snapshot.bytes_transferred,
        reads = snapshot.read_calls,
        writes = snapshot.write_calls,
        buffer_size,
        "async transfer complete"
    );
    Ok(snapshot)
}

/// Transfer everything from `source` to `sink`; `estimated_size` picks the buffer tier.
pub async fn transfer_async<R, W>(
    mut source: R,
    mut sink: W,
    estimated_size: Option<u64>,
) -> Result<TransferSnapshot, StreamError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let buffer_size = estimated_size.map(buffer_size_for).unwrap_or(DEFAULT_BUFFER_SIZE);
    copy_loop(&mut source, &mut sink, buffer_size).await
}

/// Remaining bytes of an open file (`len - position`), `None` if either query fails.
async fn remaining_len(file: &mut File) -> Option<u64> {
    let len = file.metadata().await.ok()?.len();
    let position = file.stream_position().await.ok()?;
    Some(len.saturating_sub(position))
}

/// Like [`transfer_async`], but without an estimate the buffer is sized from what is
/// left of the file.
pub async fn transfer_file_async<W>(
    mut file: File,
    mut sink: W,
    estimated_size: Option<u64>,
) -> Result<TransferSnapshot, StreamError>
where
    W: AsyncWrite + Unpin,
{
    let size = match estimated_size {
        Some(size) => Some(size),
        None => remaining_len(&mut file).await,
    };
    let buffer_size = match size {
        Some(size) => buffer_size_for(size),
        None => {
            debug!("file size unknown, using default buffer");
            DEFAULT_BUFFER_SIZE
        }
    };
    copy_loop(&mut file, &mut sink, buffer_size).await
}
