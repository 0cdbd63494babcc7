//! URL assembly for every request the connection issues.
//!
//! # Design
//! Kept free of any transport types so the joining rules can be tested on
//! their own. Segments are joined by exactly one `/`, empty segments vanish,
//! and the path always ends with a single `/` before the query string.

/// Join `parts` into one URL and append `query` when it is non-empty.
///
/// Leading and trailing slashes on each part are dropped before joining, so
/// `"https://x/"`, `"/api/controller/"`, `""`, `"12"` becomes
/// `"https://x/api/controller/12/"`. The query string is appended verbatim
/// after a single `?`; callers join multiple parameters with `&` themselves.
pub fn build_url(query: Option<&str>, parts: &[&str]) -> String {
    let mut url = String::new();
    for part in parts {
        let part = part.trim_start_matches('/').trim_end_matches('/');
        if part.is_empty() {
            continue;
        }
        url.push_str(part);
        url.push('/');
    }
    if url.is_empty() {
        url.push('/');
    }

    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Fold optional paging parameters into a caller-supplied query string.
///
/// Produces `<query>&page=<n>&perPage=<n>`, emitting each paging parameter
/// only when it is present. Returns `None` when nothing remains.
pub fn page_query(query: Option<&str>, page: Option<u32>, per_page: Option<u32>) -> Option<String> {
    let mut params: Vec<String> = Vec::new();
    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        params.push(query.to_string());
    }
    if let Some(page) = page {
        params.push(format!("page={page}"));
    }
    if let Some(per_page) = per_page {
        params.push(format!("perPage={per_page}"));
    }

    if params.is_empty() {
        None
    } else {
        Some(params.join("&"))
    }
}
