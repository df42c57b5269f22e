//! Configuration section definitions.
//!
//! Each module corresponds to a section in `permalink.toml`:
//!
//! | Module      | TOML Section   | Purpose                                |
//! |-------------|----------------|----------------------------------------|
//! | `filters`   | `[[filters]]`  | Regex rewrites on link hooks           |
//! | `permalink` | `[permalink]`  | Rewrite structure, bases, slash policy |
//! | `site`      | `[site]`       | Base URL, timezone, front page         |
//! | `slug`      | `[slug]`       | Fallback slug generation               |
//! | `store`     | `[store]`      | Content document location              |

mod filters;
mod permalink;
mod site;
mod slug;
mod store;

pub use filters::FilterConfig;
pub use permalink::{PermalinkConfig, PostTypeConfig};
pub use site::SiteSectionConfig;
pub use slug::{MAX_SLUG_LENGTH, SlugConfig, SlugSeparator};
pub use store::StoreConfig;
