// Console sink — prints boosts to the terminal.
//
// Used as the default destination when nothing else is configured, and
// handy for dry-running routing rules before pointing the bot at a real
// chat service.

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;

use crate::message::ProtocolProfile;

use super::BoostSink;

pub struct ConsoleSink;

#[async_trait]
impl BoostSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn profile(&self) -> ProtocolProfile {
        ProtocolProfile::plain()
    }

    async fn deliver(&self, channel: &str, text: &str) -> Result<()> {
        println!("{} {}", format!("[{channel}]").dimmed(), text);
        Ok(())
    }
}
