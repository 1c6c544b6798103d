/*!
 * Media container access.
 *
 * `MediaReader` lists the subtitle tracks of a container and reads the
 * captions of one of them; `SubtitleTranscoder` turns an ASS/SSA file into
 * SRT. The ffprobe/ffmpeg implementations run the tools as subprocesses with
 * a per-call timeout.
 */

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;

use crate::app_config::MediaConfig;
use crate::errors::MediaError;
use crate::subtitle::ass::parse_ass_events;
use crate::subtitle::normalizer::CaptionPayload;
use crate::subtitle::srt::{parse_srt_file, SubtitleEntry};

/// One subtitle stream of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Position among the container's subtitle streams, starting at 0
    pub id: usize,
    /// Absolute stream index inside the container
    pub stream_index: usize,
    /// Codec name as reported by the demuxer
    pub codec: String,
    /// Language tag, if any
    pub language: Option<String>,
    /// Track title, if any
    pub name: Option<String>,
    /// How caption text is encoded
    pub payload: CaptionPayload,
}

impl SubtitleTrack {
    pub fn new(id: usize, stream_index: usize, codec: impl Into<String>) -> Self {
        let codec = codec.into();
        let payload = CaptionPayload::from_codec(&codec);
        Self {
            id,
            stream_index,
            codec,
            language: None,
            name: None,
            payload,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Short description for logs and error messages
    pub fn describe(&self) -> String {
        format!(
            "#{} {} [{}]{}",
            self.id,
            self.codec,
            self.language.as_deref().unwrap_or("und"),
            self.name.as_deref().map(|n| format!(" \"{}\"", n)).unwrap_or_default()
        )
    }
}

/// One caption as read from a track, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaption {
    pub start_ms: u64,
    pub end_ms: u64,
    pub raw_text: String,
}

impl RawCaption {
    pub fn new(start_ms: u64, end_ms: u64, raw_text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            raw_text: raw_text.into(),
        }
    }

    pub fn start(&self) -> String {
        SubtitleEntry::format_timestamp(self.start_ms)
    }

    pub fn end(&self) -> String {
        SubtitleEntry::format_timestamp(self.end_ms)
    }
}

impl From<SubtitleEntry> for RawCaption {
    fn from(entry: SubtitleEntry) -> Self {
        Self::new(entry.start_time_ms, entry.end_time_ms, entry.text)
    }
}

/// Access to the subtitle tracks of a media container
#[async_trait]
pub trait MediaReader: Send + Sync {
    /// Check that `path` is a container this reader understands
    async fn probe(&self, path: &Path) -> Result<(), MediaError>;

    /// Subtitle tracks in container order
    async fn list_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, MediaError>;

    /// All captions of one track, in track order
    async fn read_captions(&self, path: &Path, track: &SubtitleTrack) -> Result<Vec<RawCaption>, MediaError>;
}

/// ASS/SSA to SRT conversion
#[async_trait]
pub trait SubtitleTranscoder: Send + Sync {
    async fn convert_to_srt(&self, input: &Path, output: &Path) -> Result<(), MediaError>;
}

/// Check if a subtitle codec is bitmap-based (cannot be converted to text)
pub fn is_bitmap_codec(codec_name: &str) -> bool {
    CaptionPayload::from_codec(codec_name).is_bitmap()
}

/// Keep only the meaningful lines of ffmpeg stderr, dropping the version
/// banner, build configuration and stream metadata.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "title",
        "BPS",
        "DURATION",
        "NUMBER_OF",
        "_STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

async fn run_tool(program: &str, args: &[String], timeout: Duration) -> Result<Output, MediaError> {
    debug!("Running {} {}", program, args.join(" "));

    let future = Command::new(program).args(args).kill_on_drop(true).output();

    tokio::select! {
        result = future => result.map_err(|e| MediaError::Process {
            tool: program.to_string(),
            message: format!("failed to execute: {}", e),
        }),
        _ = tokio::time::sleep(timeout) => Err(MediaError::Timeout {
            tool: program.to_string(),
            secs: timeout.as_secs(),
        }),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `MediaReader` backed by ffprobe and ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegMediaReader {
    ffmpeg_path: String,
    ffprobe_path: String,
    timeout: Duration,
}

impl FfmpegMediaReader {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn ffprobe_json(&self, path: &Path, extra: &[&str]) -> Result<Value, MediaError> {
        let mut args: Vec<String> = vec!["-v".into(), "error".into(), "-print_format".into(), "json".into()];
        args.extend(extra.iter().map(|a| a.to_string()));
        args.push(path_arg(path));

        let output = run_tool(&self.ffprobe_path, &args, self.timeout).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::InvalidContainer(filter_ffmpeg_stderr(&stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&stdout).map_err(|e| MediaError::Parse(format!("ffprobe output: {}", e)))
    }

    /// Parse the `streams` array of ffprobe JSON output
    pub fn tracks_from_probe(json: &Value) -> Vec<SubtitleTrack> {
        let Some(streams) = json.get("streams").and_then(|s| s.as_array()) else {
            return Vec::new();
        };

        streams
            .iter()
            .enumerate()
            .map(|(id, stream)| {
                let stream_index = stream
                    .get("index")
                    .and_then(|v| v.as_u64())
                    .map(|v| v as usize)
                    .unwrap_or(id);
                let codec = stream.get("codec_name").and_then(|v| v.as_str()).unwrap_or("unknown");
                let tag = |key: &str| {
                    stream
                        .get("tags")
                        .and_then(|t| t.get(key))
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                };

                SubtitleTrack {
                    language: tag("language"),
                    name: tag("title"),
                    ..SubtitleTrack::new(id, stream_index, codec)
                }
            })
            .collect()
    }
}

#[async_trait]
impl MediaReader for FfmpegMediaReader {
    async fn probe(&self, path: &Path) -> Result<(), MediaError> {
        if !path.is_file() {
            return Err(MediaError::InvalidContainer(format!("{:?} does not exist", path)));
        }

        let json = self.ffprobe_json(path, &["-show_entries", "format=format_name"]).await?;
        match json.get("format").and_then(|f| f.get("format_name")).and_then(|v| v.as_str()) {
            Some(format) => {
                debug!("{:?} is a {} container", path, format);
                Ok(())
            }
            None => Err(MediaError::InvalidContainer(format!("{:?} has no recognizable format", path))),
        }
    }

    async fn list_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, MediaError> {
        let json = self.ffprobe_json(path, &["-show_streams", "-select_streams", "s"]).await?;
        let tracks = Self::tracks_from_probe(&json);
        debug!("Found {} subtitle tracks in {:?}", tracks.len(), path);
        Ok(tracks)
    }

    async fn read_captions(&self, path: &Path, track: &SubtitleTrack) -> Result<Vec<RawCaption>, MediaError> {
        if track.payload.is_bitmap() {
            return Err(MediaError::UnsupportedCodec(track.codec.clone()));
        }

        let (codec, extension) = match track.payload {
            CaptionPayload::Ssa => ("ass", "ass"),
            _ => ("srt", "srt"),
        };

        let dir = tempfile::tempdir()?;
        let output_path = dir.path().join(format!("track_{}.{}", track.id, extension));

        let args = vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            path_arg(path),
            "-map".to_string(),
            format!("0:{}", track.stream_index),
            "-c:s".to_string(),
            codec.to_string(),
            path_arg(&output_path),
        ];

        let output = run_tool(&self.ffmpeg_path, &args, self.timeout).await?;
        if !output.status.success() {
            let filtered = filter_ffmpeg_stderr(&String::from_utf8_lossy(&output.stderr));
            error!("Subtitle extraction failed: {}", filtered);
            return Err(MediaError::Process {
                tool: self.ffmpeg_path.clone(),
                message: filtered,
            });
        }

        let entries = match track.payload {
            CaptionPayload::Ssa => {
                let bytes = std::fs::read(&output_path)?;
                parse_ass_events(&String::from_utf8_lossy(&bytes))
            }
            _ => parse_srt_file(&output_path).map_err(|e| MediaError::Parse(e.to_string()))?,
        };

        if entries.is_empty() {
            warn!("Track {} of {:?} produced no captions", track.describe(), path);
        }
        Ok(entries.into_iter().map(RawCaption::from).collect())
    }
}

/// `SubtitleTranscoder` that shells out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl SubtitleTranscoder for FfmpegTranscoder {
    async fn convert_to_srt(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        let args = vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            path_arg(input),
            "-c:s".to_string(),
            "srt".to_string(),
            path_arg(output),
        ];

        let result = run_tool(&self.ffmpeg_path, &args, self.timeout).await?;
        if !result.status.success() {
            return Err(MediaError::Process {
                tool: self.ffmpeg_path.clone(),
                message: filter_ffmpeg_stderr(&String::from_utf8_lossy(&result.stderr)),
            });
        }
        Ok(())
    }
}
