//! Automaton file format auto-detection

use super::args::SerializationFormat;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Detected format of an automaton file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDetection {
    /// Serialization format of the (decompressed) payload
    pub format: SerializationFormat,
    /// Whether the payload is gzip compressed
    pub gzip: bool,
    /// Detection method used for `format`
    pub method: DetectionMethod,
}

/// Method used to detect the serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Format implied by a file name, ignoring a trailing `.gz`.
///
/// Returns the format (if the extension names one) and whether the name
/// ends in `.gz`.
pub fn format_from_extension(path: &Path) -> (Option<SerializationFormat>, bool) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let (stem, gzip) = match name.strip_suffix(".gz") {
        Some(stem) => (stem.to_string(), true),
        None => (name, false),
    };
    let format = match Path::new(&stem).extension().and_then(|e| e.to_str()) {
        Some("json") => Some(SerializationFormat::Json),
        Some("bin") | Some("bincode") => Some(SerializationFormat::Bincode),
        _ => None,
    };
    (format, gzip)
}

/// Detect the format of an existing automaton file.
///
/// Gzip is recognised by its magic bytes. The payload format comes from
/// `user_format`, then the file extension, then a content sniff (JSON
/// records start with `{`).
pub fn detect_format(path: &Path, user_format: Option<SerializationFormat>) -> Result<FormatDetection> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut head = Vec::with_capacity(64);
    file.by_ref()
        .take(64)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if head.is_empty() {
        bail!("Automaton file {} is empty", path.display());
    }

    let gzip = head.starts_with(&GZIP_MAGIC);

    if let Some(format) = user_format {
        return Ok(FormatDetection {
            format,
            gzip,
            method: DetectionMethod::UserSpecified,
        });
    }

    if let (Some(format), _) = format_from_extension(path) {
        return Ok(FormatDetection {
            format,
            gzip,
            method: DetectionMethod::Extension,
        });
    }

    let payload = if gzip {
        let mut decoded = Vec::with_capacity(64);
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        flate2::read::GzDecoder::new(file)
            .take(64)
            .read_to_end(&mut decoded)
            .with_context(|| format!("Failed to decompress {}", path.display()))?;
        decoded
    } else {
        head
    };

    let format = match payload.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => SerializationFormat::Json,
        _ => SerializationFormat::Bincode,
    };
    Ok(FormatDetection {
        format,
        gzip,
        method: DetectionMethod::Content,
    })
}
