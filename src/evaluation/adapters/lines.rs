//! Newline-delimited message source over any buffered async reader.
//!
//! The worker binary wires this to standard input so that any queue consumer
//! able to print one payload per line can feed it.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::evaluation::ports::{MessageSource, SourceResult};

/// Message source yielding one payload per non-blank input line.
#[derive(Debug)]
pub struct LineMessageSource<R> {
    reader: R,
}

impl<R> LineMessageSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Wraps a buffered reader.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R> MessageSource for LineMessageSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_message(&mut self) -> SourceResult<Option<Vec<u8>>> {
        loop {
            let mut line = Vec::new();
            let read = self.reader.read_until(b'\n', &mut line).await?;
            if read == 0 {
                return Ok(None);
            }
            let payload = trim_line_ending(line);
            if payload.iter().any(|byte| !byte.is_ascii_whitespace()) {
                return Ok(Some(payload));
            }
        }
    }
}

fn trim_line_ending(mut line: Vec<u8>) -> Vec<u8> {
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    line
}
