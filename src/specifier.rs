//! `npm:` specifier handling and alias encoding.
//!
//! An install token (`<name>[@<range>]`) is turned into an alias that is safe
//! both as an npm alias name and as a single directory name under
//! `<cache root>/node_modules/`.
//!
//! The encoding is deterministic but not injective: a token that already
//! contains one of the escape texts (for example a literal `_at_`) can encode
//! to the same alias as a different token. The escape table is kept as is so
//! existing caches stay valid.

use std::path::{Path, PathBuf};

/// Prefix marking a specifier as owned by this loader.
pub const NPM_PREFIX: &str = "npm:";

/// Reserved symbols and their escapes, applied in order.
///
/// `>=` and `<=` must come before `>` and `<`.
const ESCAPES: &[(&str, &str)] = &[
    ("@", "_at_"),
    ("^", "_caret_"),
    ("~", "_tilde_"),
    (">=", "_gteq_"),
    (">", "_gt_"),
    ("<=", "_lteq_"),
    ("<", "_lt_"),
    ("*", "_any_"),
];

/// Return the install token of an `npm:` specifier, or `None` for any other specifier.
pub fn strip_npm_prefix(specifier: &str) -> Option<&str> {
    specifier.strip_prefix(NPM_PREFIX)
}

/// Encode an install token into a filesystem-safe package alias.
pub fn encode_alias(token: &str) -> String {
    ESCAPES
        .iter()
        .fold(token.to_string(), |acc, (symbol, escape)| {
            acc.replace(symbol, escape)
        })
}

/// Name passed to the package manager: `<alias>@npm:<token>`.
pub fn install_name(alias: &str, token: &str) -> String {
    format!("{}@{}{}", alias, NPM_PREFIX, token)
}

/// Where and under which name one install token lives in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTarget {
    /// Raw install token, passed to the package manager untouched.
    pub token: String,
    /// Encoded alias, the package's directory name.
    pub alias: String,
    /// `<cache root>/node_modules/<alias>`
    pub cache_path: PathBuf,
    /// `<alias>@npm:<token>`
    pub install_name: String,
}

impl PackageTarget {
    /// Compute the target for `token` under `cache_root`.
    pub fn new(token: &str, cache_root: &Path) -> Self {
        let alias = encode_alias(token);
        let cache_path = cache_root.join("node_modules").join(&alias);
        let install_name = install_name(&alias, token);

        Self {
            token: token.to_string(),
            alias,
            cache_path,
            install_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_npm_prefix() {
        assert_eq!(strip_npm_prefix("npm:left-pad"), Some("left-pad"));
        assert_eq!(strip_npm_prefix("npm:"), Some(""));
        assert_eq!(strip_npm_prefix("./local/file.js"), None);
        assert_eq!(strip_npm_prefix("node:fs"), None);
        // Prefix match is case sensitive
        assert_eq!(strip_npm_prefix("NPM:react"), None);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let token = "typescript@~4.7.4";
        assert_eq!(encode_alias(token), encode_alias(token));
        assert_eq!(encode_alias(token), "typescript_at__tilde_4.7.4");
    }

    #[test]
    fn test_encode_react_caret() {
        assert_eq!(encode_alias("react@^18.0.0"), "react_at__caret_18.0.0");
        assert_eq!(
            install_name(&encode_alias("react@^18.0.0"), "react@^18.0.0"),
            "react_at__caret_18.0.0@npm:react@^18.0.0"
        );
    }

    #[test]
    fn test_encode_compound_operators_first() {
        let alias = encode_alias(">=1.0.0");
        assert!(alias.contains("_gteq_1.0.0"));
        assert!(!alias.contains("_gt_=1.0.0"));

        assert_eq!(encode_alias("<=2"), "_lteq_2");
        assert_eq!(encode_alias("pkg@>1 <2"), "pkg_at__gt_1 _lt_2");
    }

    #[test]
    fn test_encode_replaces_every_occurrence() {
        let alias = encode_alias("^1.0.0 || ^2.0.0");
        assert_eq!(alias.matches("_caret_").count(), 2);
        assert_eq!(alias, "_caret_1.0.0 || _caret_2.0.0");
    }

    #[test]
    fn test_encode_wildcard_and_plain_names() {
        assert_eq!(encode_alias("lodash@*"), "lodash_at__any_");
        assert_eq!(encode_alias("left-pad"), "left-pad");
        assert_eq!(encode_alias(""), "");
    }

    #[test]
    fn test_encoded_alias_has_no_reserved_symbols() {
        let alias = encode_alias("@scope/pkg@>=1.2.3 <2 || ~3 || ^4 || *");
        for symbol in ["@", "^", "~", ">", "<", "*"] {
            assert!(!alias.contains(symbol), "{} left in {}", symbol, alias);
        }
    }

    #[test]
    fn test_known_collision_is_preserved() {
        // Escape text in the raw token is not itself escaped.
        assert_eq!(encode_alias("a@1"), encode_alias("a_at_1"));
    }

    #[test]
    fn test_package_target_layout() {
        let root = Path::new("/tmp/npm-cache");
        let target = PackageTarget::new("left-pad", root);

        assert_eq!(target.token, "left-pad");
        assert_eq!(target.alias, "left-pad");
        assert_eq!(target.install_name, "left-pad@npm:left-pad");
        assert_eq!(target.cache_path, root.join("node_modules").join("left-pad"));
    }

    #[test]
    fn test_install_name_shape() {
        for token in ["react@^18.0.0", "typescript@~4.7.4", "left-pad", "x@>=1 <=2"] {
            let target = PackageTarget::new(token, Path::new("/c"));
            assert_eq!(
                target.install_name,
                format!("{}@npm:{}", encode_alias(token), token)
            );
        }
    }
}
