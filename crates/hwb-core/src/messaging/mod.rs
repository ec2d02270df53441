//! Outbound messaging (Telegram today, behind a port).

pub mod notifier;
pub mod port;
