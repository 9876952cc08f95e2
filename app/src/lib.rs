//! Command-line host for the Tool Tracker client.
//!
//! The core crate builds requests and parses responses; this crate performs
//! the network round-trips with ureq and prints list screens as text or HTML.

pub mod app;
pub mod cli;
pub mod transport;

pub use app::App;
pub use cli::{Cli, Command, Format};
pub use transport::{Transport, UreqTransport};
