//! Link-following pagination.
//!
//! Servers that cap response size return one page plus a `rel="next"` link
//! to the following page. This module only reads links; fetching is the
//! client's job.

use crate::types::Link;

/// A payload that may carry paging links.
pub trait Paged {
    /// The page's links, empty when it declares none.
    fn links(&self) -> &[Link];
}

/// Address of the page following `page`, or `None` on the last page.
///
/// Links are scanned in order and the first `rel="next"` wins, even if the
/// server repeats the relation later.
pub fn next_link<P: Paged + ?Sized>(page: &P) -> Option<&str> {
    page.links()
        .iter()
        .find(|link| link.is_next())
        .map(|link| link.href.as_str())
}

impl Paged for [Link] {
    fn links(&self) -> &[Link] {
        self
    }
}

impl Paged for Vec<Link> {
    fn links(&self) -> &[Link] {
        self
    }
}
