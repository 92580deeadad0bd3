//! Multi-page response scripts.

use serde_json::Value;

use crate::fixtures::{feature_collection, location_feature};

/// One scripted page: the URL it is served at and its body.
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub url: String,
    pub body: Value,
}

/// Location pages served at `first_url`, then `first_url?page=2`, ...
///
/// `page_sizes[i]` features go on page `i + 1`; ids run from 1 upwards
/// across pages. Every page but the last links to its successor.
pub fn paged_locations(first_url: &str, page_sizes: &[usize]) -> Vec<ScriptedPage> {
    let url_of = |page: usize| {
        if page == 1 {
            first_url.to_string()
        } else {
            format!("{}?page={}", first_url, page)
        }
    };

    let mut next_id = 1i64;
    let mut pages = Vec::with_capacity(page_sizes.len());
    for (i, &size) in page_sizes.iter().enumerate() {
        let page = i + 1;
        let features = (0..size)
            .map(|_| {
                let id = next_id;
                next_id += 1;
                location_feature(id, &format!("Station {}", id), id as f64 * 0.1, 50.0)
            })
            .collect();
        let next = (page < page_sizes.len()).then(|| url_of(page + 1));
        pages.push(ScriptedPage {
            url: url_of(page),
            body: feature_collection(features, next.as_deref()),
        });
    }
    pages
}
