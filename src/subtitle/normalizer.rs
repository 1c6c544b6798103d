/*!
 * Caption text cleanup.
 *
 * Raw caption text carries speaker dashes, italic tags, `<br />` breaks and
 * inline `{...}` positioning hints. Container tracks may also carry a wider
 * rich-text tag set or SSA escapes; `CaptionPayload` is resolved once per
 * track and says which extra cleanup applies.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RICH_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(b|i|u|font|s|ruby|rt|rb|sub|sup)(\s[^>]*)?>").unwrap()
});

static LOCATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^{}]*\}").unwrap());

/// How the text of one subtitle track is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPayload {
    /// Plain text with at most SRT-style italics
    Text,
    /// HTML-like rich text (`mov_text` and friends)
    RichText,
    /// SSA/ASS dialogue text with `\N` line breaks
    Ssa,
    /// Images; never usable for vocabulary
    Bitmap,
}

impl CaptionPayload {
    /// Payload kind for an ffprobe codec name
    pub fn from_codec(codec: &str) -> Self {
        match codec.to_ascii_lowercase().as_str() {
            "ass" | "ssa" => Self::Ssa,
            "mov_text" | "tx3g" => Self::RichText,
            "hdmv_pgs_subtitle" | "pgssub" | "dvd_subtitle" | "dvdsub" | "dvb_subtitle" | "dvbsub" | "xsub" => {
                Self::Bitmap
            }
            _ => Self::Text,
        }
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap)
    }

    /// Decode the payload-specific markup, then `normalize`
    pub fn clean(&self, raw: &str) -> String {
        match self {
            Self::Text | Self::Bitmap => normalize(raw),
            Self::RichText => normalize(&remove_rich_text(raw)),
            Self::Ssa => normalize(&ssa_line_breaks(raw)),
        }
    }
}

/// `\N` and `\n` escapes to real newlines
pub fn ssa_line_breaks(text: &str) -> String {
    text.replace("\\N", "\n").replace("\\n", "\n")
}

/// Strip `b,i,u,font,s,ruby,rt,rb,sub,sup` tags, keeping their content
pub fn remove_rich_text(text: &str) -> String {
    RICH_TEXT_REGEX.replace_all(text, "").into_owned()
}

pub fn has_rich_text(text: &str) -> bool {
    RICH_TEXT_REGEX.is_match(text)
}

/// Drop one leading speaker dash, italic tags and `{...}` hints; `<br />`
/// becomes a newline
pub fn normalize(raw: &str) -> String {
    let mut content = raw.strip_prefix('-').unwrap_or(raw).to_string();
    if content.contains("<i>") || content.contains("</i>") {
        content = content.replace("<i>", "").replace("</i>", "");
    }
    if content.contains("<br />") {
        content = content.replace("<br />", "\n");
    }
    remove_location_info(&content)
}

/// Remove inline `{...}` positioning hints
pub fn remove_location_info(content: &str) -> String {
    LOCATION_REGEX.replace_all(content, "").into_owned()
}
