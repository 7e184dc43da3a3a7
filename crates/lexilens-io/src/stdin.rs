use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Line reader over the process's stdin
pub fn stdin_reader() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}

/// Awaits `on_line` for every non-blank line, in input order, until EOF.
/// The first handler error stops the watch.
pub async fn watch_lines<R, F, Fut>(reader: R, mut on_line: F) -> Result<(), anyhow::Error>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), anyhow::Error>>,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            on_line(line.to_string()).await?;
        }
    }
    tracing::debug!("Input closed");
    Ok(())
}
