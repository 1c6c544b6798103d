use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: Input classification and file helpers

/// Extensions read as plain-text documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md", "java", "cs", "cpp", "c", "h", "kt", "js", "py", "ts", "rs", "go"];

/// Extensions handed to the media container reader
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "webm", "mov", "avi", "m4v", "wmv", "flv", "mpg", "mpeg", "ogv", "mts", "m2ts",
];

/// How an input file is turned into a vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain text or source code
    Document,
    /// SubRip subtitles
    Srt,
    /// ASS/SSA subtitles
    Ass,
    /// Media container with embedded subtitle tracks
    Media,
    /// Nothing we can read
    Unsupported,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Classify an input by extension. `.ts` is a TypeScript document, not
    /// an MPEG transport stream.
    pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> InputKind {
        let Some(ext) = path.as_ref().extension() else {
            return InputKind::Unsupported;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        match ext.as_str() {
            "srt" => InputKind::Srt,
            "ass" | "ssa" => InputKind::Ass,
            e if DOCUMENT_EXTENSIONS.contains(&e) => InputKind::Document,
            e if MEDIA_EXTENSIONS.contains(&e) => InputKind::Media,
            _ => InputKind::Unsupported,
        }
    }

    /// Media files among `inputs`; directories are walked recursively
    pub fn find_media_files<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if input.is_file() {
                result.push(input.to_path_buf());
                continue;
            }

            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry.with_context(|| format!("Failed to read directory entry under {:?}", input))?;
                let path = entry.path();
                if path.is_file() && Self::detect_input_kind(path) == InputKind::Media {
                    found.push(path.to_path_buf());
                }
            }
            found.sort();
            result.extend(found);
        }

        Ok(result)
    }

    /// Read a text file as UTF-8, replacing invalid sequences and dropping a BOM
    pub fn read_text_lossy<P: AsRef<Path>>(path: P) -> std::io::Result<String> {
        let bytes = fs::read(path.as_ref())?;
        let decoded = String::from_utf8_lossy(&bytes);
        let text: &str = &decoded;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }

    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// File name without extension, used as a vocabulary or subtitles name
    pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
