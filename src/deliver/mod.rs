// Destination sinks — the outbound delivery seam.
//
// The pump never special-cases a destination by name: everything it needs
// is behind BoostSink. A sink advertises its protocol profile (markup,
// length bound, fan-out support) and accepts text fragments per channel.

pub mod console;
pub mod mastodon;
pub mod matrix;

use anyhow::Result;
use async_trait::async_trait;

use crate::message::ProtocolProfile;

/// One destination protocol adapter. Implementations must be async
/// because delivery is network I/O.
#[async_trait]
pub trait BoostSink: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Formatting constraints for this destination.
    fn profile(&self) -> ProtocolProfile;

    /// Deliver one text fragment to one channel. For sinks whose profile
    /// disables fan-out, `channel` is empty and may be ignored.
    async fn deliver(&self, channel: &str, text: &str) -> Result<()>;
}
