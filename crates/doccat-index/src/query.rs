//! Request bodies for the search engine.

use chrono::{DateTime, SecondsFormat, Utc};
use doccat_types::SearchQuery;
use serde_json::{json, Value};

/// Fields searched by free text.
pub const TEXT_FIELDS: &[&str] = &["filename", "content_type", "path"];

/// Index mapping. String fields are keywords so that filename lookups and
/// content-type filters are exact.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "filename":     { "type": "keyword" },
                "path":         { "type": "keyword" },
                "content_type": { "type": "keyword" },
                "size":         { "type": "long" },
                "upload_date":  { "type": "date" }
            }
        }
    })
}

/// Escape the wildcard metacharacters `*`, `?`, and `\`.
pub fn escape_wildcard(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the `query` clause for a [`SearchQuery`].
///
/// Every populated filter becomes one clause inside `bool.filter`; free text
/// is itself a `bool.should` of wildcard clauses, one per [`TEXT_FIELDS`]
/// entry. With no filters the result is `match_all`.
pub fn build_search_query(query: &SearchQuery) -> Value {
    let mut filter_clauses: Vec<Value> = Vec::new();

    if let Some(text) = &query.text {
        let pattern = format!("*{}*", escape_wildcard(text));
        let should: Vec<Value> = TEXT_FIELDS
            .iter()
            .map(|field| {
                json!({
                    "wildcard": {
                        *field: { "value": pattern, "case_insensitive": true }
                    }
                })
            })
            .collect();
        filter_clauses.push(json!({
            "bool": { "should": should, "minimum_should_match": 1 }
        }));
    }

    if let Some((start, end)) = &query.date_range {
        filter_clauses.push(json!({
            "range": {
                "upload_date": { "gte": timestamp(start), "lte": timestamp(end) }
            }
        }));
    }

    if let Some(content_type) = &query.content_type {
        filter_clauses.push(json!({ "term": { "content_type": content_type } }));
    }

    if filter_clauses.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "filter": filter_clauses } })
    }
}

/// Exact match on the `filename` keyword.
pub(crate) fn filename_term(filename: &str) -> Value {
    json!({ "term": { "filename": filename } })
}
