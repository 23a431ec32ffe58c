//! HTTP interface for difflame.
//!
//! Serves two endpoints:
//!
//! - `GET /` - an HTML page embedding a d3 flame graph
//! - `GET /data` - the aggregated change tree as JSON
//!
//! In diff mode `/data` takes `from` and `to` revisions and diffs a live
//! repository on every request. In file mode it returns one of a fixed set of
//! previously saved trees, chosen with `file`.
//!
//! ```rust,no_run
//! use difflame_server::{serve, ServeMode, ServerConfig};
//!
//! # async fn run() -> Result<(), difflame_server::ServerError> {
//! let config = ServerConfig::builder()
//!     .port(8080u16)
//!     .mode(ServeMode::diffs("."))
//!     .build()
//!     .unwrap();
//! serve(config).await
//! # }
//! ```

mod config;
mod error;
mod page;
mod routes;

pub use config::{AllowList, ServeMode, ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use page::render_page;
pub use routes::{routes, serve, DataQuery};
