/// DuSleuth Server: streaming HTTP frontend.
///
/// This crate contains the request orchestration and transport. Sizing,
/// caching and encoding live in `dusleuth-core`.
///
/// # Modules
///
/// - [`config`]: Listening port, base directory, cache and apology timings.
/// - [`orchestrator`]: Per-request race between the walk and the apology timer.
/// - [`path`]: Normalised logical request paths.
/// - [`render`]: Minimal HTML fragments.
/// - [`routes`]: `axum` router, streaming body, server loop.
/// - [`error`]: Failures surfaced to clients.
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod path;
pub mod render;
pub mod routes;

pub use config::ServerConfig;
pub use error::ServeError;
pub use orchestrator::{ChannelSink, InspectRequest, Inspector, ResponseSink};
pub use routes::{router, serve};
