//! # Despacho de Requests
//! src/dispatch/mod.rs
//!
//! Este módulo toma un `Request` ya parseado y produce la `Response`:
//!
//! ```text
//! Request → validar → estático | endpoint → handler → Response
//!                  ↘ falla → ErrorRegistry → Response
//! ```
//!
//! - `dispatcher`: la máquina de estados principal
//! - `context`: lo que recibe cada handler
//! - `error`: la taxonomía de fallas y su código de estado
//! - `errors`: handlers de error por código
//! - `statics`: recursos estáticos con caché

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod errors;
pub mod statics;

pub use context::{Context, Handler, HandlerError, HandlerResult};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use errors::ErrorRegistry;
pub use statics::{FsStore, ResourceStore};
