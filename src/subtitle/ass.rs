/*!
 * ASS/SSA events and the in-process ASS to SRT transcoder.
 */

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MediaError;
use crate::subtitle::container::SubtitleTranscoder;
use crate::subtitle::srt::{write_srt, SubtitleEntry};

static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^{}]*\}").unwrap());

/// Field order used when an `[Events]` section has no `Format:` line
const DEFAULT_EVENT_FORMAT: &[&str] = &[
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

/// Parse `H:MM:SS.cc` to milliseconds
pub fn parse_ass_time(value: &str) -> Option<u64> {
    let (clock, fraction) = value.trim().split_once('.')?;
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let digits: String = fraction.chars().take(3).collect();
    let mut millis: u64 = digits.parse().ok()?;
    for _ in digits.len()..3 {
        millis *= 10;
    }

    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Dialogue text with override blocks removed and escapes resolved
pub fn clean_dialogue_text(text: &str) -> String {
    let stripped = OVERRIDE_BLOCK_REGEX.replace_all(text, "");
    stripped
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
        .trim()
        .to_string()
}

/// Dialogue events of an ASS/SSA script, in script order. Only the last
/// `Format:` field may contain commas.
pub fn parse_ass_events(content: &str) -> Vec<SubtitleEntry> {
    let content = content.trim_start_matches('\u{feff}');
    let mut entries = Vec::new();
    let mut in_events = false;
    let mut format: Vec<String> = DEFAULT_EVENT_FORMAT.iter().map(|f| f.to_string()).collect();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events {
            continue;
        }

        if let Some(fields) = strip_key(line, "Format:") {
            format = fields.split(',').map(|f| f.trim().to_ascii_lowercase()).collect();
            continue;
        }

        let Some(values) = strip_key(line, "Dialogue:") else {
            continue;
        };

        let parts: Vec<&str> = values.splitn(format.len(), ',').collect();
        if parts.len() < format.len() {
            warn!("Skipping malformed dialogue at line {}", line_no + 1);
            continue;
        }

        let field = |name: &str| format.iter().position(|f| f == name).map(|i| parts[i].trim());
        let (Some(start), Some(end)) = (
            field("start").and_then(parse_ass_time),
            field("end").and_then(parse_ass_time),
        ) else {
            warn!("Skipping dialogue with invalid timing at line {}", line_no + 1);
            continue;
        };

        let text = format
            .iter()
            .position(|f| f == "text")
            .map(|i| clean_dialogue_text(parts[i]))
            .unwrap_or_default();
        if text.is_empty() {
            continue;
        }

        entries.push(SubtitleEntry::new(entries.len() + 1, start, end.max(start), text));
    }

    entries
}

fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let head = line.get(..key.len())?;
    head.eq_ignore_ascii_case(key).then(|| &line[key.len()..])
}

/// Converts ASS/SSA files to SRT without external tools
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAssTranscoder;

impl NativeAssTranscoder {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, input: &Path, output: &Path) -> Result<usize, MediaError> {
        let bytes = fs::read(input)?;
        let content = String::from_utf8_lossy(&bytes);

        let mut entries = parse_ass_events(&content);
        if entries.is_empty() {
            return Err(MediaError::Parse(format!("no dialogue events in {:?}", input)));
        }

        entries.sort_by_key(|e| e.start_time_ms);
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        write_srt(&entries, output)?;
        debug!("Converted {} dialogue events from {:?}", entries.len(), input);
        Ok(entries.len())
    }
}

#[async_trait]
impl SubtitleTranscoder for NativeAssTranscoder {
    async fn convert_to_srt(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        self.convert(input, output).map(|_| ())
    }
}
