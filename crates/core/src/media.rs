//! Naming rules for uploaded media files.
//!
//! Uploads keep only their extension; the stored name is a fresh UUID so two
//! uploads of `beat.mp3` never collide and client-supplied paths never reach
//! the storage backend.

use crate::error::CoreError;

/// Category of an uploaded file, which decides the accepted extensions and
/// the storage folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Picture,
    Audio,
    Archive,
}

const PICTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "aac", "m4a"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z"];

impl MediaKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Picture => PICTURE_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
            MediaKind::Archive => ARCHIVE_EXTENSIONS,
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Picture => "pictures",
            MediaKind::Audio => "audio",
            MediaKind::Archive => "archives",
        }
    }
}

/// Lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Title derived from an uploaded filename: the name without its extension.
pub fn title_from_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

/// Build a collision-free storage key `<folder>/<uuid>.<ext>` for an upload.
pub fn unique_filename(original: &str, kind: MediaKind) -> Result<String, CoreError> {
    let ext = extension_of(original).ok_or_else(|| {
        CoreError::Validation(format!("File '{original}' has no extension"))
    })?;

    if !kind.extensions().contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported file type '.{ext}'. Supported: {:?}",
            kind.extensions()
        )));
    }

    Ok(format!("{}/{}.{ext}", kind.folder(), uuid::Uuid::new_v4()))
}
