//! URL composition from a configured scheme/host and a relative path.

/// Join `scheme_and_host` and `path` with exactly one `/` between them.
///
/// Any number of trailing slashes on the host and leading slashes on the
/// path collapse into one. Query strings in `path` are kept as-is.
pub fn build_url(scheme_and_host: &str, path: &str) -> String {
    let base = scheme_and_host.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_separator_for_all_slash_combinations() {
        for base in ["https://api.x.com", "https://api.x.com/", "https://api.x.com//"] {
            for path in ["v1/items", "/v1/items", "//v1/items"] {
                assert_eq!(build_url(base, path), "https://api.x.com/v1/items", "{base} + {path}");
            }
        }
    }

    #[test]
    fn test_base_with_path_prefix() {
        assert_eq!(
            build_url("http://gateway:8080/orders/", "/v2/list?page=1"),
            "http://gateway:8080/orders/v2/list?page=1"
        );
    }

    #[test]
    fn test_empty_path_points_at_root() {
        assert_eq!(build_url("https://api.x.com", ""), "https://api.x.com/");
    }
}
