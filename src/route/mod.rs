// Channel routing — which destination channels a boost lands in, decided
// by the feed-identifying fields of the record.
//
// The map is built once from `kind:value=channel` rules at startup and is
// read-only afterwards. Lookups are case-insensitive on the match value.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::boost::BoostRecord;

/// Which record field a routing rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Podcast,
    FeedId,
    Url,
    Guid,
}

impl MatchKind {
    const ALL: [MatchKind; 4] = [
        MatchKind::Podcast,
        MatchKind::FeedId,
        MatchKind::Url,
        MatchKind::Guid,
    ];

    fn field<'a>(&self, record: &'a BoostRecord) -> Option<&'a str> {
        match self {
            MatchKind::Podcast => record.podcast.as_deref(),
            MatchKind::FeedId => record.feed_id.as_deref(),
            MatchKind::Url => record.url.as_deref(),
            MatchKind::Guid => record.guid.as_deref(),
        }
    }
}

impl FromStr for MatchKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "podcast" => Ok(MatchKind::Podcast),
            "feed" | "feedid" | "feed_id" => Ok(MatchKind::FeedId),
            "url" => Ok(MatchKind::Url),
            "guid" => Ok(MatchKind::Guid),
            other => Err(anyhow!(
                "unknown match kind {other:?} (expected podcast, feed, url, or guid)"
            )),
        }
    }
}

/// One configured routing rule, parsed from `kind:value=channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub kind: MatchKind,
    pub value: String,
    pub channel: String,
}

impl FromStr for RouteRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("route rule {s:?} is missing the kind: prefix"))?;
        let (value, channel) = rest
            .rsplit_once('=')
            .ok_or_else(|| anyhow!("route rule {s:?} is missing the =channel suffix"))?;
        if value.trim().is_empty() || channel.trim().is_empty() {
            return Err(anyhow!("route rule {s:?} has an empty value or channel"));
        }
        Ok(RouteRule {
            kind: kind.parse()?,
            value: value.trim().to_string(),
            channel: channel.trim().to_string(),
        })
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Immutable multi-valued lookup from (kind, match value) to channels.
#[derive(Debug, Default)]
pub struct ChannelMap {
    entries: HashMap<(MatchKind, String), BTreeSet<String>>,
}

impl ChannelMap {
    pub fn from_rules(rules: &[RouteRule]) -> Self {
        let mut entries: HashMap<(MatchKind, String), BTreeSet<String>> = HashMap::new();
        for rule in rules {
            entries
                .entry((rule.kind, normalize(&rule.value)))
                .or_default()
                .insert(rule.channel.clone());
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the destination channels for a record.
    ///
    /// With no rules configured, every boost goes to the defaults.
    /// Otherwise the union of all matches across the four kinds wins, and
    /// an empty union falls back to the defaults.
    pub fn route(&self, record: &BoostRecord, default_channels: &[String]) -> BTreeSet<String> {
        if self.entries.is_empty() {
            return default_channels.iter().cloned().collect();
        }

        let mut channels = BTreeSet::new();
        for kind in MatchKind::ALL {
            if let Some(value) = kind.field(record) {
                if let Some(mapped) = self.entries.get(&(kind, normalize(value))) {
                    channels.extend(mapped.iter().cloned());
                }
            }
        }

        if channels.is_empty() {
            default_channels.iter().cloned().collect()
        } else {
            channels
        }
    }

    /// Mapped channels that do not appear in the configured channel list,
    /// compared case-insensitively. Surfaced as startup warnings — a rule
    /// pointing at a channel the bot never joins is probably a typo.
    pub fn channels_not_in(&self, known: &[String]) -> Vec<String> {
        let known: BTreeSet<String> = known.iter().map(|c| normalize(c)).collect();
        let mut missing: BTreeSet<String> = BTreeSet::new();
        for mapped in self.entries.values() {
            for channel in mapped {
                if !known.contains(&normalize(channel)) {
                    missing.insert(channel.clone());
                }
            }
        }
        missing.into_iter().collect()
    }
}
