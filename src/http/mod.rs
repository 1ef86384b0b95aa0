//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa la parte de cable del protocolo HTTP/1.0 desde
//! cero, sin usar librerías de alto nivel. Incluye:
//!
//! - Parsing de requests HTTP/1.0
//! - Construcción y serialización de responses
//! - Manejo de status codes
//! - Formato del header `Date`
//!
//! ## Especificación HTTP/1.0
//!
//! El protocolo HTTP/1.0 (RFC 1945) es más simple que HTTP/1.1:
//! - No requiere el header `Host`
//! - No tiene chunked transfer encoding
//! - No mantiene conexiones persistentes por defecto
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: http_router/0.1\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```

pub mod date;      // Header Date (RFC 1123)
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
