//! # Collectors Example
//!
//! Three producer threads stand in for OS callbacks (notifications,
//! accessibility, audio features) and emit records before any consumer exists.
//! A consumer then drains the backlog, attaches a live sink and receives the
//! records emitted afterwards.
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventspool=debug cargo run --example collectors
//! ```

use std::{sync::Arc, thread, time::Duration};

use eventspool::{channels, ChannelSink, Config, EventKind, Pipeline, SinkRef};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

fn spawn_collector(pipeline: &Arc<Pipeline>, channel: &'static str, count: usize) -> thread::JoinHandle<()> {
    let pipeline = Arc::clone(pipeline);
    thread::spawn(move || {
        for i in 0..count {
            let payload = format!(r#"{{"seq":{i},"source":"{channel}"}}"#);
            pipeline.emit(channel, payload);
            thread::sleep(Duration::from_millis(2));
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let storage = tempfile::tempdir()?;
    let pipeline = Pipeline::builder(Config::default())
        .with_storage_dir(storage.path())
        .with_channels(channels::WELL_KNOWN)
        .with_channel_capacity(channels::AUDIO_FEATURES, 16)
        .build()?;

    let mut diag = pipeline.subscribe();
    let watcher = tokio::spawn(async move {
        let mut evicted = 0usize;
        loop {
            match diag.recv().await {
                Ok(ev) if ev.kind == EventKind::RecordsEvicted => evicted += ev.count.unwrap_or(0),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return evicted,
            }
        }
    });

    // Phase 1: no consumer, everything is persisted.
    let producers = [
        spawn_collector(&pipeline, channels::NOTIFICATIONS, 10),
        spawn_collector(&pipeline, channels::ACCESSIBILITY, 10),
        spawn_collector(&pipeline, channels::AUDIO_FEATURES, 40),
    ];
    for p in producers {
        if p.join().is_err() {
            eprintln!("collector thread panicked");
        }
    }

    println!("Backlog:");
    for channel in pipeline.channels() {
        let records = pipeline.drain(&channel);
        println!(" ├─► {channel:<15} {} record(s)", records.len());
        if let Some(last) = records.last() {
            println!(" │     last: {last}");
        }
    }

    // Phase 2: consumer attached, new records are also pushed live.
    let (sink, mut rx) = ChannelSink::new("demo-ui");
    let sink: SinkRef = sink;
    pipeline.attach_sink(channels::NOTIFICATIONS, &sink);

    let live = spawn_collector(&pipeline, channels::NOTIFICATIONS, 3);
    for _ in 0..3 {
        match tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
            Ok(Some(rec)) => println!(" ├─► live {}: {}", rec.channel(), rec.payload()),
            _ => break,
        }
    }
    if live.join().is_err() {
        eprintln!("collector thread panicked");
    }

    pipeline.detach_sink(channels::NOTIFICATIONS);
    let leftover = pipeline.drain(channels::NOTIFICATIONS);
    println!(" └─► persisted alongside live delivery: {}", leftover.len());

    pipeline.shutdown().await;
    drop(pipeline);
    let evicted = watcher.await?;
    println!("Evicted by capacity: {evicted}");
    Ok(())
}
