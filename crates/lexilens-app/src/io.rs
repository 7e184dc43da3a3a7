use std::sync::Arc;

use kanal::AsyncSender;
use lexilens_types::{AppEvent, DisplaySize, DragTarget, Point};
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Turns one line of user input into an event
pub fn parse_command(line: &str) -> Result<AppEvent, String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    let number = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("'{s}' is not a number"))
    };
    let point = |args: &[&str]| match args {
        [x, y] => Ok(Point::new(number(*x)?, number(*y)?)),
        _ => Err(format!("'{command}' takes X Y")),
    };

    match command.as_str() {
        "tap" => Ok(AppEvent::Tap(point(&rest)?)),
        "down" => match rest.split_first() {
            Some((target, coords)) => {
                let target = DragTarget::parse(target)
                    .ok_or_else(|| format!("unknown drag target '{target}'"))?;
                Ok(AppEvent::PointerDown {
                    target,
                    at: point(coords)?,
                })
            }
            None => Err("'down' takes a target and X Y".to_string()),
        },
        "move" => Ok(AppEvent::PointerMove(point(&rest)?)),
        "up" => Ok(AppEvent::PointerUp),
        "confirm" => Ok(AppEvent::Confirm),
        "cancel" => Ok(AppEvent::Cancel),
        "resize" => {
            let size = point(&rest)?;
            Ok(AppEvent::Resize(DisplaySize::new(size.x, size.y)))
        }
        "edit" | "lookup" if rest.is_empty() => Err(format!("'{command}' takes a word")),
        "edit" => Ok(AppEvent::EditWord(rest.join(" "))),
        "lookup" => Ok(AppEvent::Lookup(rest.join(" "))),
        "quit" | "exit" => Ok(AppEvent::Quit),
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Forwards each command line in input order, waiting for every send to
/// land before reading on. `Quit` follows the last command at EOF.
pub async fn forward_commands<R>(reader: R, event_tx: &AsyncSender<AppEvent>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    lexilens_io::stdin::watch_lines(reader, |line| {
        let tx = event_tx.clone();
        async move {
            match parse_command(&line) {
                Ok(event) => tx.send(event).await?,
                Err(e) => tracing::warn!("Ignoring '{}': {}", line, e),
            }
            Ok(())
        }
    })
    .await?;

    event_tx.send(AppEvent::Quit).await?;
    Ok(())
}

/// Feeds stdin commands to the event loop; EOF quits the app
pub async fn watcher_io(
    _state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("Reading commands from stdin");

    tokio::select! {
        result = forward_commands(lexilens_io::stdin::stdin_reader(), &event_tx) => {
            if let Err(e) = result {
                tracing::error!("Stdin watcher error: {}", e);
            }
        }
        _ = cancel.cancelled() => {
            tracing::info!("Stdin watcher stopping");
        }
    }

    Ok(())
}
