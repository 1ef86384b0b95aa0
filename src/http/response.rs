//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Los handlers construyen un `Response` con status, body y mimetype; el
//! servidor lo convierte a bytes con [`Response::to_bytes`].
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: http_router/0.1\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_router::http::{Response, StatusCode};
//!
//! let response = Response::new()
//!     .with_status(StatusCode::OK)
//!     .with_body("hello");
//!
//! let bytes = response.to_bytes("http_router/0.1", "Sun, 06 Nov 1994 08:49:37 GMT");
//! assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;

/// Mimetype por defecto de las respuestas
pub const DEFAULT_MIMETYPE: &str = "text/plain";

/// Representa una respuesta HTTP/1.0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado; `None` mientras el handler no lo haya fijado
    status: Option<StatusCode>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,

    /// Content-Type de la respuesta
    mimetype: String,
}

impl Response {
    /// Crea una respuesta vacía, sin status
    ///
    /// El dispatcher completa el status con 200 si el handler no lo fija.
    pub fn new() -> Self {
        Self {
            status: None,
            body: Vec::new(),
            mimetype: DEFAULT_MIMETYPE.to_string(),
        }
    }

    /// Atajo para una respuesta de texto con status
    ///
    /// # Ejemplo
    /// ```
    /// use http_router::http::{Response, StatusCode};
    ///
    /// let response = Response::text(StatusCode::NOT_FOUND, "nope");
    /// assert_eq!(response.status(), Some(StatusCode::NOT_FOUND));
    /// assert_eq!(response.body(), b"nope");
    /// ```
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new().with_status(status).with_body(body)
    }

    /// Fija el código de estado
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para recursos estáticos binarios (imágenes, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Establece el Content-Type
    pub fn with_mimetype(mut self, mimetype: &str) -> Self {
        self.mimetype = mimetype.to_string();
        self
    }

    /// Versión mutable de [`Response::with_status`]
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Versión mutable de [`Response::with_mimetype`]
    pub fn set_mimetype(&mut self, mimetype: &str) {
        self.mimetype = mimetype.to_string();
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera el formato HTTP/1.0:
    /// - Status line: `HTTP/1.0 200 OK\r\n`
    /// - Headers fijos: `Server`, `Date`, `Content-Type`, `Content-Length`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    ///
    /// Una respuesta sin status se serializa como 200.
    pub fn to_bytes(&self, server_name: &str, date: &str) -> Vec<u8> {
        let status = self.status.unwrap_or(StatusCode::OK);

        let head = format!(
            "HTTP/1.0 {}\r\nServer: {}\r\nDate: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
            status,
            server_name,
            date,
            self.mimetype,
            self.body.len()
        );

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    /// Obtiene el código de estado, si fue fijado
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body como texto (lossy)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Obtiene el Content-Type
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

    #[test]
    fn test_new_response() {
        let response = Response::new();
        assert_eq!(response.status(), None);
        assert_eq!(response.mimetype(), "text/plain");
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_builders() {
        let response = Response::new()
            .with_status(StatusCode::BAD_REQUEST)
            .with_mimetype("application/json")
            .with_body(r#"{"ok": false}"#);

        assert_eq!(response.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(response.mimetype(), "application/json");
        assert_eq!(response.body_text(), r#"{"ok": false}"#);
    }

    #[test]
    fn test_to_bytes() {
        let response = Response::text(StatusCode::OK, "Test").with_mimetype("text/html");

        let text = String::from_utf8(response.to_bytes("srv", DATE)).unwrap();

        assert_eq!(
            text,
            "HTTP/1.0 200 OK\r\n\
             Server: srv\r\n\
             Date: Thu, 01 Jan 1970 00:00:00 GMT\r\n\
             Content-Type: text/html\r\n\
             Content-Length: 4\r\n\
             \r\n\
             Test"
        );
    }

    #[test]
    fn test_unset_status_serializes_as_ok() {
        let text = String::from_utf8(Response::new().to_bytes("srv", DATE)).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.ends_with("Content-Length: 0\r\n\r\n"));
    }

    #[test]
    fn test_binary_body_length() {
        let data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::new().with_body_bytes(data.clone());
        let bytes = response.to_bytes("srv", DATE);

        assert!(bytes.ends_with(&data));
        assert!(String::from_utf8_lossy(&bytes).contains("Content-Length: 4\r\n"));
    }
}
