use std::path::{Component, Path};
use url::Url;

use super::error::{Result, StorageError};

/// Get the path of `file` relative to `root`, joined with '/'
///
/// Segments are kept verbatim so they can be appended to a collection URL
/// on any platform.
pub fn relative_name(root: &Path, file: &Path) -> Result<String> {
    let rel = file
        .strip_prefix(root)
        .map_err(|_| StorageError::RelativePath {
            path: file.display().to_string(),
            root: root.display().to_string(),
        })?;

    let mut segments = Vec::new();
    for component in rel.components() {
        if let Component::Normal(segment) = component {
            let segment = segment.to_str().ok_or_else(|| StorageError::NonUtf8Path {
                path: file.display().to_string(),
            })?;
            segments.push(segment);
        }
    }

    Ok(segments.join("/"))
}

/// Append a relative name to the collection URL
///
/// This is plain string concatenation: a collection URL without a trailing
/// slash will have the name glued onto its last segment.
pub fn target_url(collection: &Url, name: &str) -> Result<Url> {
    let joined = format!("{}{}", collection, name);
    Url::parse(&joined).map_err(|e| StorageError::invalid_url(e, joined))
}

/// Return a copy of `url` with its scheme replaced
///
/// `Url::set_scheme` refuses to move between special and non-special
/// schemes, so those cases are re-parsed from the string form.
pub fn with_scheme(url: &Url, scheme: &str) -> Result<Url> {
    let mut changed = url.clone();
    if changed.set_scheme(scheme).is_ok() {
        return Ok(changed);
    }

    let rest = &url.as_str()[url.scheme().len()..];
    let rebuilt = format!("{}{}", scheme, rest);
    let parsed = Url::parse(&rebuilt).map_err(|_| StorageError::Scheme {
        url: url.to_string(),
        scheme: scheme.to_string(),
    })?;

    // Re-parsing under a special scheme can move a path segment into the host
    let unchanged = parsed.scheme() == scheme
        && parsed.host_str() == url.host_str()
        && same_port(url, &parsed)
        && parsed.path() == url.path()
        && parsed.query() == url.query();
    if !unchanged {
        return Err(StorageError::Scheme {
            url: url.to_string(),
            scheme: scheme.to_string(),
        });
    }
    Ok(parsed)
}

/// An explicit port that is the new scheme's default is dropped on parse
fn same_port(original: &Url, changed: &Url) -> bool {
    match (original.port(), changed.port()) {
        (a, b) if a == b => true,
        (Some(port), None) => changed.port_or_known_default() == Some(port),
        _ => false,
    }
}
