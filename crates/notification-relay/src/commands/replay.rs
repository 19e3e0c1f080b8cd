use super::UserArgs;
use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use notification_delivery::{
    DeliveryController, InboundEvent, Notification, NotificationCollection, SledSessionStore,
    Status, config,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(
    store_path: &Path,
    events_path: Option<&Path>,
    user: &UserArgs,
    json: bool,
) -> Result<()> {
    let session_key = &config::current().session_key;
    let store = SledSessionStore::new(store_path, session_key)
        .await
        .context("Failed to open session store")?;

    let mut controller = DeliveryController::mount(Arc::new(store), user.principal())
        .await
        .context("Failed to mount delivery controller")?;

    match controller.broadcast_channel() {
        Some(channel) => info!("Listening for broadcasts on {}", channel),
        None => info!("No user given, broadcasts will be ignored"),
    }

    if let Some(path) = events_path {
        let events = read_events(path).await?;
        let (sender, receiver) = async_channel::unbounded();

        // Feed from a separate task so the loop sees a live channel
        let feeder = smol::spawn(async move {
            for event in events {
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        });

        let processed = controller.run(receiver).await;
        feeder.await;
        info!("Replayed {} events", processed);
    }

    if json {
        let records = controller.notifications().to_records();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        display_table(controller.notifications());
    }

    Ok(())
}

async fn read_events(path: &Path) -> Result<Vec<InboundEvent>> {
    let text = async_fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<InboundEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => warn!("Skipping line {}: {}", index + 1, e),
        }
    }

    Ok(events)
}

fn display_table(notifications: &NotificationCollection) {
    if notifications.is_empty() {
        println!("No notifications");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "TITLE", "STATUS", "ACTIONS", "READ"]);

    for notification in notifications {
        let (status, color) = status_cell(notification);
        table.add_row(vec![
            Cell::new(notification.id()),
            Cell::new(notification.title().unwrap_or("-")),
            Cell::new(status).fg(color),
            Cell::new(action_names(notification)),
            Cell::new(if notification.is_read() { "yes" } else { "no" }),
        ]);
    }

    println!("{}", table);
}

fn status_cell(notification: &Notification) -> (&'static str, Color) {
    match notification.status() {
        Some(Status::Success) => ("success", Color::Green),
        Some(Status::Warning) => ("warning", Color::Yellow),
        Some(Status::Danger) => ("danger", Color::Red),
        Some(Status::Info) => ("info", Color::Blue),
        None => ("-", Color::DarkGrey),
    }
}

fn action_names(notification: &Notification) -> String {
    let names: Vec<&str> = notification
        .actions()
        .iter()
        .flat_map(|entry| entry.actions())
        .map(|action| action.name())
        .collect();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
