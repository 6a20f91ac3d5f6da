//! URL handling module for Gleaner
//!
//! This module provides URL normalization (the key of the visited set) and
//! the same-site scope used to decide which discovered links are followed.

mod normalize;
mod scope;

pub use normalize::{normalize_parsed, normalize_url};
pub use scope::{site_domain, SiteScope};
