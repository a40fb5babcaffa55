// Event pump — drives the pipeline from invoice stream to sinks.
//
// One logical consumer: invoices are processed strictly in stream order,
// and the pure decode/annotate/route/compose steps run synchronously per
// event. Delivery is channel-major — each routed channel receives all of
// a message's fragments, in order, before the next channel is addressed.
//
// Error containment is the whole point of this module: nothing a single
// bad event can do is allowed to stop the stream.

use anyhow::Result;
use tracing::{debug, error, info};

use crate::boost::numerology::Numerology;
use crate::boost::{self, BoostRecord};
use crate::deliver::BoostSink;
use crate::lnd::{Invoice, InvoiceSource};
use crate::message::{chunk, compose};
use crate::route::ChannelMap;

/// Per-record filters applied after decoding.
#[derive(Debug, Default)]
pub struct PumpOptions {
    /// Records with an effective amount strictly below this are skipped.
    pub minimum_donation: Option<u64>,
    /// Sending-app allow-list, matched case-insensitively against the
    /// payload's `name` field. Empty means accept all.
    pub allowed_names: Vec<String>,
}

impl PumpOptions {
    fn allows(&self, record: &BoostRecord) -> bool {
        if !self.allowed_names.is_empty() {
            let Some(name) = record.name.as_deref() else {
                return false;
            };
            let name = name.to_lowercase();
            if !self
                .allowed_names
                .iter()
                .any(|allowed| allowed.to_lowercase() == name)
            {
                return false;
            }
        }

        if let Some(minimum) = self.minimum_donation {
            if record.effective_sats() < minimum {
                return false;
            }
        }

        true
    }
}

pub struct EventPump {
    numerology: Numerology,
    channel_map: ChannelMap,
    default_channels: Vec<String>,
    sinks: Vec<Box<dyn BoostSink>>,
    options: PumpOptions,
}

impl EventPump {
    pub fn new(
        channel_map: ChannelMap,
        default_channels: Vec<String>,
        sinks: Vec<Box<dyn BoostSink>>,
        options: PumpOptions,
    ) -> Self {
        Self {
            numerology: Numerology::new(),
            channel_map,
            default_channels,
            sinks,
            options,
        }
    }

    /// Consume the invoice stream until it closes. Item-level stream
    /// errors are logged and skipped; only the subscription ending stops
    /// the loop.
    pub async fn run(&self, source: &mut dyn InvoiceSource) -> Result<()> {
        info!(sinks = self.sinks.len(), "Event pump running");

        while let Some(event) = source.next_invoice().await {
            match event {
                Ok(invoice) => self.handle_invoice(&invoice).await,
                Err(e) => error!(error = %e, "Skipping undecodable invoice event"),
            }
        }

        info!("Invoice stream closed");
        Ok(())
    }

    async fn handle_invoice(&self, invoice: &Invoice) {
        for htlc in &invoice.htlcs {
            let Some(payload) = htlc.boost_payload() else {
                continue;
            };

            match boost::decode(&payload, invoice.value) {
                Ok(record) => self.dispatch(&record).await,
                Err(e) => debug!(error = %e, "Skipping payload"),
            }
        }
    }

    /// Filter, annotate, route, compose, and deliver one decoded boost.
    pub async fn dispatch(&self, record: &BoostRecord) {
        if !self.options.allows(record) {
            debug!(
                sender = %record.sender_name,
                sats = record.effective_sats(),
                "Boost filtered out"
            );
            return;
        }

        let symbols = self.numerology.annotate(record.effective_sats());
        let channels = self.channel_map.route(record, &self.default_channels);

        for sink in &self.sinks {
            let profile = sink.profile();
            let text = compose(record, &symbols, &profile);
            let fragments = match profile.max_length {
                Some(max) => chunk(&text, max),
                None => vec![text],
            };

            if profile.multi_channel {
                for channel in &channels {
                    self.deliver_fragments(sink.as_ref(), channel, &fragments)
                        .await;
                }
            } else {
                self.deliver_fragments(sink.as_ref(), "", &fragments).await;
            }
        }
    }

    /// Send every fragment in order. A failed fragment is logged and does
    /// not abort the rest — at-most-once on error, no retries.
    async fn deliver_fragments(&self, sink: &dyn BoostSink, channel: &str, fragments: &[String]) {
        for fragment in fragments {
            if let Err(e) = sink.deliver(channel, fragment).await {
                error!(sink = sink.name(), channel = %channel, error = %e, "Delivery failed");
            }
        }
    }
}
