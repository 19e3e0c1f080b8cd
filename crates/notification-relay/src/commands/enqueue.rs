use anyhow::{Context, Result};
use notification_delivery::{Notification, SledSessionStore, config};
use serde_json::Value;
use std::path::Path;
use tracing::info;

pub async fn run(store_path: &Path, input: &Path) -> Result<()> {
    let text = read_input(input).await?;
    let parsed: Value = serde_json::from_str(&text).context("Input is not valid JSON")?;

    let records = match parsed {
        Value::Array(records) => records,
        record => vec![record],
    };

    // Validate everything before queueing anything
    let notifications = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Notification::from_record(record)
                .with_context(|| format!("Record {} is not a valid notification", index))
        })
        .collect::<Result<Vec<_>>>()?;

    let session_key = &config::current().session_key;
    let store = SledSessionStore::new(store_path, session_key)
        .await
        .context("Failed to open session store")?;

    for notification in &notifications {
        notification
            .send(&store)
            .await
            .with_context(|| format!("Failed to queue notification {}", notification.id()))?;
        println!("{}", notification.id());
    }

    info!("Queued {} notifications", notifications.len());
    Ok(())
}

async fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        smol::unblock(|| std::io::read_to_string(std::io::stdin()))
            .await
            .context("Failed to read stdin")
    } else {
        async_fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}
