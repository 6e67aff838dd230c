use std::fmt::Write;

use crate::catalog::CatalogStats;
use crate::search_operations::QueryResult;
use crate::tester::TestResponse;

pub fn format_search_results(result: &QueryResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} APIs", result.len());
    if result.total_matches > result.len() {
        let _ = writeln!(
            out,
            "(showing the top {} of {} matching APIs)",
            result.len(),
            result.total_matches
        );
    }

    for hit in &result.hits {
        let record = &hit.record;
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} | {} | Relevance: {:.3}",
            record.name, record.category, hit.score
        );
        let _ = writeln!(out, "  Description:   {}", record.description);
        let _ = writeln!(out, "  Documentation: {}", record.link);
        let _ = writeln!(
            out,
            "  Auth: {}  HTTPS: {}  CORS: {}",
            if record.auth.is_empty() { "-" } else { record.auth.as_str() },
            if record.https { "yes" } else { "no" },
            record.cors
        );
    }
    out
}

pub fn format_stats(stats: &CatalogStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total APIs:  {}", stats.total_apis);
    let _ = writeln!(out, "Categories:  {}", stats.total_categories);
    let _ = writeln!(out, "Auth types:  {}", stats.auth_types.join(", "));
    let _ = writeln!(out, "Source:      {}", stats.origin);
    let _ = writeln!(out, "Loaded at:   {}", stats.loaded_at.to_rfc3339());
    if !stats.categories.is_empty() {
        let _ = writeln!(out);
        for category in &stats.categories {
            let _ = writeln!(out, "  - {}", category);
        }
    }
    out
}

/// Status line, headers, then the body; pretty-printed when it is JSON.
pub fn format_test_response(response: &TestResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Status Code: {} ({} ms)",
        response.status, response.elapsed_ms
    );

    let _ = writeln!(out, "\nResponse Headers:");
    for (name, value) in &response.headers {
        let _ = writeln!(out, "  {}: {}", name, value);
    }

    let _ = writeln!(out, "\nResponse Body:");
    let body = response
        .json_body()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| response.body.clone());
    let _ = writeln!(out, "{}", body);
    if response.truncated {
        let _ = writeln!(out, "... (truncated)");
    }
    out
}
