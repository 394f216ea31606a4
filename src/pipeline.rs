//! Streaming encode/decode over async readers and writers
//!
//! The transform itself handles one bounded message. This layer cuts an
//! input stream into `max_payload_bytes()` chunks, encodes a batch of chunks
//! in parallel on the blocking pool and writes the names in input order,
//! one per line. Decoding reads names line by line and writes the payloads.

use crate::encoder::SubdomainEncoder;
use crate::{Result, SubdomainError};
use bytes::{Bytes, BytesMut};
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Totals for one streaming run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Domain names written or read
    pub names: usize,

    /// Payload bytes read or written
    pub bytes: usize,
}

/// Encode everything `reader` yields, writing one name per line to `writer`
///
/// An empty stream writes nothing. The first error stops the run.
pub async fn encode_stream<R, W, E>(
    mut reader: R,
    mut writer: W,
    encoder: Arc<E>,
    concurrency: usize,
) -> Result<StreamStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    E: SubdomainEncoder + Send + Sync + 'static + ?Sized,
{
    let chunk_size = encoder.max_payload_bytes();
    if chunk_size == 0 {
        return Err(SubdomainError::ConfigurationError(
            "base domain and cipher leave no room for payload".to_string(),
        ));
    }
    let concurrency = concurrency.max(1);
    debug!("Encoding stream in chunks of {} bytes, {} in flight", chunk_size, concurrency);

    let mut stats = StreamStats::default();
    let mut eof = false;

    while !eof {
        let mut batch: Vec<Bytes> = Vec::with_capacity(concurrency);
        while batch.len() < concurrency {
            let chunk = read_chunk(&mut reader, chunk_size).await?;
            // Short chunk means the reader is exhausted
            if chunk.len() < chunk_size {
                eof = true;
            }
            if !chunk.is_empty() {
                batch.push(chunk);
            }
            if eof {
                break;
            }
        }

        let tasks = batch.into_iter().map(|chunk| {
            let encoder = Arc::clone(&encoder);
            tokio::task::spawn_blocking(move || {
                let name = encoder.encode(&chunk);
                (chunk.len(), name)
            })
        });

        for joined in join_all(tasks).await {
            let (len, name) = joined
                .map_err(|e| SubdomainError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
            let name = name?;

            writer.write_all(name.as_bytes()).await?;
            writer.write_all(b"\n").await?;

            stats.names += 1;
            stats.bytes += len;
            debug!("Chunk {}: {} bytes -> {} chars", stats.names, len, name.len());
        }
    }

    writer.flush().await?;
    info!("Encoded {} bytes into {} names", stats.bytes, stats.names);
    Ok(stats)
}

/// Decode one name per line from `reader`, writing payloads to `writer`
///
/// Surrounding whitespace is trimmed and blank lines are skipped.
pub async fn decode_stream<R, W, E>(reader: R, mut writer: W, encoder: &E) -> Result<StreamStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    E: SubdomainEncoder + ?Sized,
{
    let mut stats = StreamStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let name = line.trim();
        if name.is_empty() {
            warn!("Skipping blank line {}", line_no);
            continue;
        }

        let payload = encoder.decode(name)?;
        writer.write_all(&payload).await?;

        stats.names += 1;
        stats.bytes += payload.len();
        debug!("Line {}: {} chars -> {} bytes", line_no, name.len(), payload.len());
    }

    writer.flush().await?;
    info!("Decoded {} names into {} bytes", stats.names, stats.bytes);
    Ok(stats)
}

/// Read up to `size` bytes, returning fewer only at end of stream
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R, size: usize) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(size);
    let mut limited = reader.take(size as u64);
    while limited.read_buf(&mut buf).await? > 0 {}
    Ok(buf.freeze())
}
