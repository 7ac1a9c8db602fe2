//! Query-string assembly for the search API
//!
//! The API takes its search expression as an OData string literal in `Query`,
//! keyword filters as separate parameters, pagination as `$top`/`$skip` and
//! the response format as `$format`.

use crate::types::{FilterValue, QueryKeyword, SearchOptions, BASE_OPTIONS, RESERVED_OPTIONS};
use std::collections::BTreeMap;

/// Response format requested from the API on every call
pub const RESPONSE_FORMAT: &str = "JSON";

/// Quote `query` as an OData string literal
pub fn quote_query(query: &str) -> String {
    format!("'{}'", query.replace('\'', "''"))
}

/// Build the `Query` parameter and the keyword filter parameters
pub fn build_query(query: &str, options: &SearchOptions) -> BTreeMap<String, String> {
    let mut queries = BTreeMap::new();
    queries.insert("Query".to_string(), quote_query(query));

    for kw in QueryKeyword::ALL {
        let Some(value) = options.filters.get(&kw) else {
            continue;
        };

        match value {
            FilterValue::One(value) => {
                queries.insert(kw.to_string(), value.clone());
            }
            FilterValue::AnyOf(values) if values.is_empty() => {}
            FilterValue::AnyOf(values) => {
                let kw_query = values
                    .iter()
                    .map(|s| format!("{kw}:{s}").trim().to_string())
                    .collect::<Vec<_>>()
                    .join(" OR ");
                queries.insert(kw.to_string(), format!("({kw_query})"));
            }
        }
    }

    queries
}

/// Return `params` without the keys named in `exclude`
pub fn filter_params(
    params: &BTreeMap<String, String>,
    exclude: &[&str],
) -> BTreeMap<String, String> {
    params
        .iter()
        .filter(|(key, _)| !exclude.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Assemble the full parameter map sent with a search request
///
/// Later sources win: client defaults, then the call's free-form params
/// (minus [`BASE_OPTIONS`]), then the query and keyword filters, then
/// pagination, then `$format`. A plain `top`/`skip` key is renamed to its
/// `$` form wherever it came from, client defaults included.
pub fn assemble(
    defaults: &BTreeMap<String, String>,
    query: &str,
    options: &SearchOptions,
) -> BTreeMap<String, String> {
    let mut params = defaults.clone();
    params.extend(filter_params(&options.params, &BASE_OPTIONS));
    params.extend(build_query(query, options));

    for reserved in RESERVED_OPTIONS {
        if let Some(value) = params.remove(reserved) {
            params.insert(format!("${reserved}"), value);
        }
    }
    if let Some(top) = options.top {
        params.insert("$top".to_string(), top.to_string());
    }
    if let Some(skip) = options.skip {
        params.insert("$skip".to_string(), skip.to_string());
    }

    params.insert("$format".to_string(), RESPONSE_FORMAT.to_string());
    params
}
