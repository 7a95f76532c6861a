use rustc_hash::FxHashSet;

/// Default hash length for the `[hash]` placeholder.
const HASH_LEN: usize = 8;

/// Computes the `[hash]` placeholder value for a chunk or asset's finalized
/// contents.
pub fn content_hash(content: &[u8]) -> String {
    let digest = blake3::hash(content);
    digest.to_hex()[..HASH_LEN].to_string()
}

/// Substitutes an asset's file-name pattern against its logical name and
/// content hash. Assets are finalized independently of one another, so
/// there is no `usedIds`-style collision set to consult.
pub fn content_hash_name(pattern: &str, name: &str, content: &[u8], extname: &str) -> String {
    let hash = content_hash(content);
    let stem = std::path::Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    substitute(pattern, &stem, &hash, extname)
}

/// Substitutes `[name]`, `[hash]`, `[extname]` placeholders in a file-name
/// pattern, then resolves any collision against `used_ids` by suffixing the
/// name segment. See DESIGN.md for the tradeoff against lengthening the
/// hash instead.
pub fn generate_id(pattern: &str, name: &str, content: &[u8], extname: &str, used_ids: &FxHashSet<String>) -> String {
    let hash = content_hash(content);
    let mut candidate = substitute(pattern, name, &hash, extname);
    if !used_ids.contains(&candidate) {
        return candidate;
    }

    let mut suffix = 1u32;
    loop {
        let suffixed_name = format!("{name}{suffix}");
        candidate = substitute(pattern, &suffixed_name, &hash, extname);
        if !used_ids.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn substitute(pattern: &str, name: &str, hash: &str, extname: &str) -> String {
    pattern.replace("[name]", name).replace("[hash]", hash).replace("[extname]", extname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        let used = FxHashSet::default();
        let id = generate_id("[name]-[hash].js", "main", b"content", ".js", &used);
        assert!(id.starts_with("main-"));
        assert!(id.ends_with(".js"));
    }

    #[test]
    fn disambiguates_collisions_by_suffixing_name() {
        let mut used = FxHashSet::default();
        let first = generate_id("[name].js", "main", b"content", ".js", &used);
        used.insert(first.clone());
        let second = generate_id("[name].js", "main", b"content", ".js", &used);
        assert_ne!(first, second);
        assert_eq!(second, "main1.js");
    }

    #[test]
    fn content_hash_is_deterministic_and_fixed_length() {
        let a = content_hash(b"same");
        let b = content_hash(b"same");
        assert_eq!(a, b);
        assert_eq!(a.len(), HASH_LEN);
    }
}
