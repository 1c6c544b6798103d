/*!
 * Subtitle formats, caption normalization and container track access.
 */

pub mod ass;
pub mod container;
pub mod normalizer;
pub mod srt;
pub mod track_selector;

pub use ass::{parse_ass_events, NativeAssTranscoder};
pub use container::{
    filter_ffmpeg_stderr, is_bitmap_codec, FfmpegMediaReader, FfmpegTranscoder, MediaReader, RawCaption,
    SubtitleTrack, SubtitleTranscoder,
};
pub use normalizer::{has_rich_text, normalize, remove_location_info, remove_rich_text, CaptionPayload};
pub use srt::{parse_srt_file, parse_srt_string, write_srt, SubtitleEntry};
pub use track_selector::{SelectedTrack, TrackSelector, DEFAULT_SAMPLE_SIZE};
