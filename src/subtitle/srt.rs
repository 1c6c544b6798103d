/*!
 * SRT entries: parsing, formatting and writing.
 */

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ExtractionError;

// @const: SRT timing line, with `,` or `.` before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Caption text, lines joined by `\n`
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    // @validates: end after start, non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: &str) -> Result<Self, ExtractionError> {
        if end_time_ms < start_time_ms {
            return Err(ExtractionError::Parse(format!(
                "invalid time range in entry {}: end {} < start {}",
                seq_num, end_time_ms, start_time_ms
            )));
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::Parse(format!("empty text in entry {}", seq_num)));
        }

        Ok(Self::new(seq_num, start_time_ms, end_time_ms, trimmed))
    }

    /// Parse `HH:MM:SS,mmm` (or `.mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, ExtractionError> {
        let invalid = || ExtractionError::Parse(format!("invalid timestamp: {}", timestamp));

        let parts: Vec<&str> = timestamp.trim().split([':', ',', '.']).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut values = [0u64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Milliseconds as `HH:MM:SS,mmm`
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Read and parse an SRT file
pub fn parse_srt_file(path: &Path) -> Result<Vec<SubtitleEntry>, ExtractionError> {
    let bytes = fs::read(path)?;
    parse_srt_string(&String::from_utf8_lossy(&bytes))
}

/// Parse SRT content into entries sorted by start time and renumbered from 1.
///
/// Malformed entries are skipped with a warning. Blank content yields no
/// entries; non-blank content without a single valid entry is a parse error.
pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, ExtractionError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut entries = Vec::new();

    let mut current_seq_num: Option<usize> = None;
    let mut current_times: Option<(u64, u64)> = None;
    let mut current_text = String::new();

    let mut finalize = |seq_num: usize, (start_ms, end_ms): (u64, u64), text: &str| {
        match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
        }
    };

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            match (current_seq_num, current_times) {
                (Some(seq_num), Some(times)) if !current_text.is_empty() => {
                    finalize(seq_num, times, &current_text);
                    current_text.clear();
                }
                (Some(seq_num), Some(_)) => warn!("Skipping subtitle entry {} with an empty caption", seq_num),
                _ => {}
            }
            current_seq_num = None;
            current_times = None;
            continue;
        }

        if current_seq_num.is_none() && current_text.is_empty() {
            if let Ok(num) = trimmed.parse::<usize>() {
                current_seq_num = Some(num);
                continue;
            }
        }

        if current_times.is_some() && current_text.is_empty() && TIMESTAMP_REGEX.is_match(trimmed) {
            // Empty caption followed directly by the next timing line
            warn!("Skipping subtitle entry before line {} with an empty caption", line_no + 1);
            current_seq_num = None;
            current_times = None;
        }

        if current_times.is_none() {
            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                current_times = Some((timestamp_from_captures(&caps, 1), timestamp_from_captures(&caps, 5)));
                // Some writers omit the counter line
                current_seq_num.get_or_insert(line_no + 1);
                continue;
            }
        }

        if current_seq_num.is_some() && current_times.is_some() {
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        } else {
            warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_no + 1, trimmed);
        }
    }

    if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
        if !current_text.is_empty() {
            finalize(seq_num, times, &current_text);
        }
    }

    if entries.is_empty() {
        if content.trim().is_empty() {
            warn!("SRT content is empty");
            return Ok(entries);
        }
        return Err(ExtractionError::Parse("no valid subtitle entries found".to_string()));
    }

    entries.sort_by_key(|entry| entry.start_time_ms);

    let overlap_count = entries
        .windows(2)
        .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
        .count();
    if overlap_count > 0 {
        debug!("Found {} overlapping subtitle entries", overlap_count);
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.seq_num = i + 1;
    }

    Ok(entries)
}

fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> u64 {
    let field = |offset: usize| -> u64 {
        caps.get(start_idx + offset)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let millis = caps
        .get(start_idx + 3)
        .map(|m| {
            // `.5` means 500ms, not 5ms
            let digits = m.as_str();
            let value: u64 = digits.parse().unwrap_or(0);
            value * 10u64.pow(3 - digits.len() as u32)
        })
        .unwrap_or(0);

    (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + millis
}

/// Render entries as SRT text
pub fn to_srt_string(entries: &[SubtitleEntry]) -> String {
    entries.iter().map(|entry| entry.to_string()).collect()
}

/// Write entries to an SRT file
pub fn write_srt(entries: &[SubtitleEntry], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_srt_string(entries))
}
