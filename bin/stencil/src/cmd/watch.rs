//! Watch command - debounced rebuilds on template changes.

use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use notify::{event::ModifyKind, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use stencil_core::Config;
use stencil_generator::{Builder, Debouncer};
use tokio::sync::mpsc;
use tokio::time;

/// Run watch mode.
///
/// Installs a recursive watcher over the template source tree and runs
/// one build per debounced change batch. Build failures are logged and
/// never stop the watcher; the loop only ends when the watcher's channel
/// closes.
pub async fn run(config: Config) -> Result<()> {
    let quiet = Duration::from_millis(config.watch.debounce_ms);
    let initial_build = config.watch.initial_build;

    let mut builder = Builder::new(config);
    let templates_dir = builder.templates_dir().to_path_buf();

    println!("Watching {}...", templates_dir.display());

    let (tx, mut rx) = mpsc::channel::<()>(64);
    let mut watcher = RecommendedWatcher::new(
        move |res: std::result::Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if is_rebuild_trigger(&event.kind) {
                    // Payload discarded: any qualifying event is a pure
                    // rebuild signal.
                    let _ = tx.blocking_send(());
                }
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    watcher
        .watch(&templates_dir, RecursiveMode::Recursive)
        .wrap_err_with(|| format!("Failed to watch {}", templates_dir.display()))?;

    if initial_build {
        run_cycle(&mut builder).await;
    }

    let mut debouncer = Debouncer::new(quiet);

    loop {
        match debouncer.deadline() {
            Some(deadline) => {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(()) => debouncer.on_event(Instant::now()),
                        None => break,
                    },
                    _ = time::sleep_until(time::Instant::from_std(deadline)) => {
                        if debouncer.fire_due(Instant::now()) {
                            // Cycles are serialized: events landing during
                            // a build queue in the channel and re-arm the
                            // debouncer afterwards.
                            run_cycle(&mut builder).await;
                        }
                    }
                }
            }
            None => match rx.recv().await {
                Some(()) => debouncer.on_event(Instant::now()),
                None => break,
            },
        }
    }

    Ok(())
}

/// One build cycle; the failure is logged and the watcher keeps running.
async fn run_cycle(builder: &mut Builder) {
    println!("Building {}...", builder.templates_dir().display());

    match builder.build().await {
        Ok(stats) => println!(
            "  {} pages, {} stylesheets in {}ms",
            stats.pages, stats.stylesheets, stats.duration_ms
        ),
        Err(e) => tracing::error!(error = %e, "build failed"),
    }
}

/// Whether a filesystem event should trigger a rebuild.
///
/// Metadata-only changes are watch noise (mtime/chmod churn) and are
/// dropped; everything else under the template tree counts.
fn is_rebuild_trigger(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}
