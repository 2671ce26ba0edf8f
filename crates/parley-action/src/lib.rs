//! Intent handlers for parley.
//!
//! Turns a classified intent into spoken replies, performing any external
//! work the intent needs (weather lookup, opening a link) along the way.
//! Handlers never fail towards the caller: every internal error becomes a
//! fixed fallback reply.

pub mod context;
pub mod error;
pub mod handler;
pub mod opener;
pub mod phrases;
pub mod reply;
pub mod weather;

pub use context::SessionContext;
pub use error::{ActionError, WeatherError};
pub use handler::{HandlerRegistry, IntentHandler, UNKNOWN_REPLY};
pub use opener::{LinkOpener, SystemLinkOpener};
pub use reply::ReplySink;
pub use weather::{OpenWeatherProvider, WeatherProvider, WeatherReport};
