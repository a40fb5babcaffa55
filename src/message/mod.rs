// Message composition — one boost record plus its numerology, rendered as
// a single line of protocol-appropriate text, then split into fragments
// for length-bounded destinations.

use crate::boost::BoostRecord;

/// Inline emphasis markup for a destination protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    None,
    /// Wrap emphasized spans in this marker (e.g. "\x02" for IRC-style bold).
    Wrap(&'static str),
}

impl Emphasis {
    fn apply(&self, text: &str) -> String {
        match self {
            Emphasis::None => text.to_string(),
            Emphasis::Wrap(marker) => format!("{marker}{text}{marker}"),
        }
    }
}

/// What the composer needs to know about a destination protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolProfile {
    pub emphasis: Emphasis,
    /// Maximum message length in characters; None means unbounded.
    pub max_length: Option<usize>,
    /// Whether the destination can address more than one channel.
    pub multi_channel: bool,
}

impl ProtocolProfile {
    /// Unbounded, markup-free profile with fan-out.
    pub fn plain() -> Self {
        Self {
            emphasis: Emphasis::None,
            max_length: None,
            multi_channel: true,
        }
    }
}

/// How an optional payload field appears in the composed message.
enum Field {
    Absent,
    /// Interpolated as-is.
    Literal(String),
    /// Pre-wrapped with its protocol decoration.
    Formatted(String),
}

impl Field {
    fn literal(value: Option<&str>) -> Self {
        match value {
            Some(v) => Field::Literal(v.to_string()),
            None => Field::Absent,
        }
    }

    fn formatted(value: Option<&str>, render: impl FnOnce(&str) -> String) -> Self {
        match value {
            Some(v) => Field::Formatted(render(v)),
            None => Field::Absent,
        }
    }

    fn resolve(self) -> Option<String> {
        match self {
            Field::Absent => None,
            Field::Literal(text) | Field::Formatted(text) => Some(text),
        }
    }
}

/// Render elapsed playback seconds as H:MM:SS (hours unpadded).
fn clock(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Compose the display message for one boost.
///
/// Field order is fixed and protocol-independent; every optional field is
/// omitted entirely (including its separator) when absent:
/// `[numerology] [podcast] [episode] sender boosted <n> sats
///  [saying "..."] [@ H:MM:SS] [via app]`
pub fn compose(record: &BoostRecord, numerology: &[&str], profile: &ProtocolProfile) -> String {
    let emphasis = &profile.emphasis;
    let amount = record.effective_sats();

    let fields = [
        Field::literal((!numerology.is_empty()).then(|| numerology.concat()).as_deref()),
        Field::formatted(record.podcast.as_deref(), |p| {
            emphasis.apply(&format!("[{p}]"))
        }),
        Field::formatted(record.episode.as_deref(), |e| {
            emphasis.apply(&format!("[{e}]"))
        }),
        Field::Literal(record.sender_name.clone()),
        Field::Formatted(format!("boosted {} sats", emphasis.apply(&amount.to_string()))),
        Field::formatted(record.message.as_deref(), |m| {
            format!("saying \"{}\"", emphasis.apply(m))
        }),
        Field::formatted(
            record.timestamp_seconds.map(clock).as_deref(),
            |ts| format!("@ {ts}"),
        ),
        Field::formatted(record.app_name.as_deref(), |app| format!("via {app}")),
    ];

    fields
        .into_iter()
        .filter_map(Field::resolve)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into contiguous fragments of at most `max_length` characters.
///
/// No word-boundary awareness: every character is preserved, and the
/// fragments concatenate back to the original text exactly. `max_length`
/// is floored to 1 so the split always terminates.
pub fn chunk(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_length)
        .map(|fragment| fragment.iter().collect())
        .collect()
}
