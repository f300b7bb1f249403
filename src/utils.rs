use crate::error::{Error, UpyResult};

/// Collapses repeated and trailing separators. Remote paths must be absolute.
pub fn normalize(path: &str) -> UpyResult<String> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(path.to_owned()));
    }

    let segments = segments(path);
    if segments.is_empty() {
        return Ok("/".to_owned());
    }

    Ok(segments.iter().fold(String::new(), |mut acc, s| {
        acc.push('/');
        acc.push_str(s);
        acc
    }))
}

/// Path segments from the root down, without empty ones.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Every prefix of a normalized path, root-most first: `/a/b` yields `/a`
/// then `/a/b`.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut current = String::new();
    segments(path)
        .into_iter()
        .map(|segment| {
            current.push('/');
            current.push_str(segment);
            current.clone()
        })
        .collect()
}

/// Parent of a normalized path. `None` for the root itself.
pub fn parent(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }

    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(pos) => Some(&path[..pos]),
        None => None,
    }
}

pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}
