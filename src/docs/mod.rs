//! Documentation visibility.
//!
//! Routes can be marked hidden: [`DocsVisibility::visible_routes`] leaves
//! them out of the documentation listing unless the caller presents a
//! reveal cookie (`swagger-show=password` by default). Hiding from the
//! listing does not block the route itself.
//!
//! [`hide_unless_revealed`] goes further and is opt-in: installed as a
//! route layer, it answers 404 on hidden routes for unrevealed callers.

pub mod visibility;

pub use visibility::{hide_unless_revealed, DocsVisibility, DEFAULT_COOKIE_NAME, DEFAULT_PASSWORD};
