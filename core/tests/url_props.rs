//! Property checks for URL assembly.

use proptest::prelude::*;
use restful_foundation::build_url;

fn segment() -> impl Strategy<Value = String> {
    ("/{0,3}", "[a-zA-Z0-9_-]{1,8}", "/{0,3}").prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

proptest! {
    #[test]
    fn joined_segments_are_well_formed(parts in prop::collection::vec(segment(), 1..6)) {
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let url = build_url(None, &refs);

        prop_assert!(!url.contains("//"));
        prop_assert!(url.ends_with('/'));
        prop_assert!(!url.ends_with("//"));

        let expected: Vec<&str> = parts.iter().map(|p| p.trim_matches('/')).collect();
        let actual: Vec<&str> = url.trim_end_matches('/').split('/').collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn query_follows_single_trailing_slash(
        parts in prop::collection::vec(segment(), 1..4),
        query in "[a-z]{1,5}=[0-9]{1,3}",
    ) {
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let url = build_url(Some(&query), &refs);
        let (path, tail) = url.split_once('?').unwrap();

        prop_assert!(path.ends_with('/'));
        prop_assert!(!path.ends_with("//"));
        prop_assert_eq!(tail, query.as_str());
    }
}

#[test]
fn documented_example() {
    let url = build_url(None, &["https://x/", "api/controller/", "", "12"]);
    assert_eq!(url, "https://x/api/controller/12/");
}
