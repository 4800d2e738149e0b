//! The safety guard: a denylist of property keys that reach into the
//! prototype machinery of a host object model.
//!
//! Every property key in the evaluator goes through [`is_safe_key`]
//! before it is used for resolution, both statically-spelled keys and keys
//! produced by evaluating a computed-member expression. Rejected keys
//! never raise; they soft-fail (resolve to undefined or cancel the
//! enclosing expression), so probing for the denylist is indistinguishable
//! from probing for a missing key.

/// Keys that are never resolvable, no matter what the context binds.
pub const UNSAFE_KEYS: [&str; 3] = ["constructor", "prototype", "__proto__"];

/// Whether a property key may be resolved at all.
pub fn is_safe_key(key: &str) -> bool {
    let safe = !UNSAFE_KEYS.contains(&key);
    if !safe {
        tracing::debug!(key, "rejected unsafe property key");
    }
    safe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_keys_rejected() {
        assert!(!is_safe_key("constructor"));
        assert!(!is_safe_key("prototype"));
        assert!(!is_safe_key("__proto__"));
    }

    #[test]
    fn test_ordinary_keys_allowed() {
        assert!(is_safe_key("name"));
        assert!(is_safe_key("length"));
        assert!(is_safe_key("toString"));
        assert!(is_safe_key(""));
        // Only exact matches are unsafe.
        assert!(is_safe_key("constructor_"));
        assert!(is_safe_key("__proto"));
    }
}
