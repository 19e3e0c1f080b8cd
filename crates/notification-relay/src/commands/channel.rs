use super::UserArgs;
use anyhow::Result;
use notification_delivery::broadcast_channel;

pub fn run(user: &UserArgs) -> Result<()> {
    match broadcast_channel(user.principal().as_deref()) {
        Some(channel) => println!("{}", channel),
        None => anyhow::bail!("No user given; unauthenticated sessions have no broadcast channel"),
    }
    Ok(())
}
