// Numerology engine — decorative symbols derived from a boost amount.
//
// The amount's decimal digits are scanned once, left to right, against a
// single precompiled alternation. Each non-overlapping match can trigger
// several symbol rules independently, then magnitude flags are appended.
// Alternation order matters: regex-lite uses leftmost-first semantics, so
// countdown runs win over the shorter literals they contain.

use regex_lite::Regex;

/// Digits of pi with the decimal point removed. Substring matches of at
/// least three digits earn pie, one slice per digit past the second.
const PI_DIGITS: &str = "3141592653589793";

/// Suffixes of this run of at least three digits count as a countdown.
const COUNTDOWN: &str = "987654321";

fn countdown_pattern() -> String {
    let suffixes: Vec<&str> = (3..=COUNTDOWN.len())
        .rev()
        .map(|n| &COUNTDOWN[COUNTDOWN.len() - n..])
        .collect();
    suffixes.join("|")
}

fn pi_pattern() -> String {
    let prefixes: Vec<&str> = (3..=PI_DIGITS.len()).rev().map(|n| &PI_DIGITS[..n]).collect();
    prefixes.join("|")
}

/// Precompiled numerology matcher. Build once at startup and share;
/// `annotate` is pure and holds no mutable state.
pub struct Numerology {
    pattern: Regex,
}

impl Numerology {
    pub fn new() -> Self {
        let pattern = format!(
            "{}|{}|{}",
            countdown_pattern(),
            r"(?:10)+|11|21|33|69|73|88|420|666|1776|1867|30057|9653|[68]00[68]|^2+$",
            pi_pattern(),
        );
        Self {
            // The pattern is assembled from fixed fragments above.
            pattern: Regex::new(&pattern).expect("numerology pattern compiles"),
        }
    }

    /// Map an amount to its ordered symbol groups. Pattern hits come first
    /// in match order, then magnitude flags. Empty means no annotation.
    pub fn annotate(&self, amount: u64) -> Vec<&'static str> {
        let digits = amount.to_string();
        let mut groups: Vec<&'static str> = Vec::new();

        for hit in self.pattern.find_iter(&digits) {
            let hit = hit.as_str();

            // Each rule below runs against every match independently — a
            // single substring may earn symbols from more than one rule.
            if hit.contains("10") {
                let rolls = hit.len() / 2;
                for _ in 0..rolls {
                    groups.push("🎳");
                }
                for _ in 0..rolls.saturating_sub(2) {
                    groups.push("🦃");
                }
            }

            match hit {
                "11" => groups.push("🎲"),
                "21" => groups.push("🪙"),
                "33" => groups.push("✨"),
                "69" => groups.push("💋"),
                "73" => groups.push("👋"),
                "88" => groups.push("🥰"),
                "420" => groups.push("✌👽💨"),
                "666" => groups.push("😈"),
                "1776" => groups.push("🇺🇸"),
                "1867" => groups.push("🇨🇦"),
                "9653" => groups.push("🐺"),
                "30057" => groups.push("🔁"),
                "6006" | "6008" | "8006" | "8008" => {
                    groups.push("🎱");
                    groups.push("🎱");
                }
                _ => {}
            }

            if !hit.is_empty() && hit.bytes().all(|b| b == b'2') {
                for _ in 0..hit.len() {
                    groups.push("🦆");
                }
            }

            if hit.len() >= 3 && PI_DIGITS.starts_with(hit) {
                for _ in 0..hit.len() - 2 {
                    groups.push("🥧");
                }
            }

            if hit.len() >= 3 && COUNTDOWN.ends_with(hit) {
                for _ in 0..hit.len() - 2 {
                    groups.push("💥");
                }
            }
        }

        // Magnitude flags are cumulative, not mutually exclusive.
        for threshold in [10_000, 50_000, 100_000] {
            if amount >= threshold {
                groups.push("🔥");
            }
        }
        if amount < 10 {
            groups.push("💩");
        }

        groups
    }

    /// Joined form of `annotate`, ready for interpolation.
    pub fn decorate(&self, amount: u64) -> String {
        self.annotate(amount).concat()
    }
}

impl Default for Numerology {
    fn default() -> Self {
        Self::new()
    }
}
