//! Storage name sanitization for uploaded videos.
//!
//! Client-supplied filenames are untrusted: they may carry path
//! components, control characters, or shell metacharacters. Every
//! uploaded file is stored under a sanitized name, and collisions are
//! resolved with a short uuid suffix so uploads never overwrite each
//! other.

/// Fallback stem used when sanitization leaves nothing usable.
const DEFAULT_STEM: &str = "video";

/// Sanitize a client-supplied filename into a safe storage name.
///
/// - Path components are stripped (only the final segment survives).
/// - Characters outside `[A-Za-z0-9._-]` become underscores.
/// - Leading dots are dropped so the result is never hidden.
/// - An empty result falls back to `"video"`.
///
/// The extension (if any) is preserved as-is after the same character
/// filtering, since the store validates extensions separately.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.').to_string();
    if trimmed.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        trimmed
    }
}

/// Lowercased extension of a filename, if it has one.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Produce a storage name that does not collide with existing names.
///
/// If `taken` reports the sanitized name as free, it is used verbatim.
/// Otherwise a short uuid fragment is inserted before the extension:
/// `clip.mp4` becomes `clip-3f2a91bc.mp4`. The suffix is regenerated
/// until a free name is found.
pub fn unique_storage_name(sanitized: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(sanitized) {
        return sanitized.to_string();
    }

    let (stem, ext) = match sanitized.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s.to_string(), Some(e.to_string())),
        _ => (sanitized.to_string(), None),
    };

    loop {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        let candidate = match &ext {
            Some(e) => format!("{stem}-{}.{e}", &tag[..8]),
            None => format!("{stem}-{}", &tag[..8]),
        };
        if !taken(&candidate) {
            return candidate;
        }
    }
}
