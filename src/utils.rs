use sha2::{Digest, Sha256};

/// Join `segments` onto `root` with `/`, dropping empty and `.` segments.
///
/// `slash_join(".", &["example", "cpp"])` is `example/cpp`, never `./example/cpp`.
pub fn slash_join(root: &str, segments: &[&str]) -> String {
    let parts = root
        .split('/')
        .chain(segments.iter().flat_map(|segment| segment.split('/')))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");
    if root.starts_with('/') {
        format!("/{parts}")
    } else {
        parts
    }
}

/// `count` repetitions of `../`
pub fn up_levels(count: usize) -> String {
    "../".repeat(count)
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
