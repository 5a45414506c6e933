//! Client identification and upload name hygiene.

use std::path::Path;

/// Extensions accepted for audio uploads, lowercase with the dot.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".flac", ".ogg", ".m4a"];

const MAX_FILENAME_LEN: usize = 255;

/// Derive a session key from request metadata.
///
/// The first hop of a `X-Forwarded-For` style header wins, then the peer address.
///
/// ```rust
/// use pedalrack_quota::client_identifier;
///
/// assert_eq!(client_identifier(Some("203.0.113.7, 10.0.0.1"), Some("10.0.0.1")), "ip_203.0.113.7");
/// assert_eq!(client_identifier(None, Some("10.0.0.1")), "ip_10.0.0.1");
/// assert_eq!(client_identifier(None, None), "ip_unknown");
/// ```
pub fn client_identifier(forwarded_for: Option<&str>, peer: Option<&str>) -> String {
    let first_hop = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty());
    let host = first_hop
        .or_else(|| peer.map(str::trim).filter(|p| !p.is_empty()))
        .unwrap_or("unknown");
    format!("ip_{host}")
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]` become
/// `_`, and the result never starts with a dot.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.starts_with('.') {
        safe.insert(0, '_');
    }

    if safe.len() > MAX_FILENAME_LEN {
        safe = match safe.rfind('.') {
            Some(dot) if dot > 0 && safe.len() - dot < MAX_FILENAME_LEN => {
                let ext = safe[dot..].to_string();
                let keep = (MAX_FILENAME_LEN - 5).min(MAX_FILENAME_LEN - ext.len());
                format!("{}{ext}", &safe[..keep.min(dot)])
            }
            _ => safe[..MAX_FILENAME_LEN].to_string(),
        };
    }

    if safe.is_empty() {
        return "unnamed_file".to_string();
    }
    safe
}

/// Returns true if the filename has a supported audio extension (case-insensitive).
pub fn is_supported_audio_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let dotted = format!(".{}", ext.to_lowercase());
            SUPPORTED_AUDIO_EXTENSIONS.contains(&dotted.as_str())
        })
}
