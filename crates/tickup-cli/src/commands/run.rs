use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

use tickup_core::{AnimatedBinder, AppConfig, TokioClock};

/// Parse one stdin line into an animation target.
///
/// Valid JSON (numbers, quoted strings, null) is taken as-is; anything else
/// becomes a bare string, which the binder coerces (non-numeric to 0).
fn parse_target(line: &str) -> Value {
    let trimmed = line.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

pub async fn run(config: AppConfig, fps: Option<u32>) -> Result<()> {
    let mut animation = config.animation.clone();
    if let Some(fps) = fps {
        animation.frame_rate = fps;
    }

    let (source_tx, source_rx) = watch::channel(Value::Null);
    let (mut display, handle) =
        AnimatedBinder::spawn_with(source_rx, Arc::new(TokioClock), animation.frame_period());

    info!(frame_rate = animation.frame_rate, "reading targets from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut source_tx = Some(source_tx);

    loop {
        tokio::select! {
            line = lines.next_line(), if source_tx.is_some() => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let target = parse_target(&line);
                        debug!(%target, "new target");
                        if let Some(tx) = &source_tx {
                            tx.send_replace(target);
                        }
                    }
                    None => {
                        // stdin closed: drop the source so the binder finishes
                        // the in-flight session and stops on its own.
                        source_tx = None;
                    }
                }
            }
            changed = display.changed() => {
                if changed.is_err() {
                    break; // binder stopped
                }
                println!("{}", *display.borrow());
            }
        }
    }

    handle.join().await;
    Ok(())
}
