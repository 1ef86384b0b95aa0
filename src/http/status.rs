//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Este módulo define los códigos de estado HTTP/1.0 que usa el servidor.
//! Según el RFC 1945, HTTP/1.0 define códigos en 5 categorías:
//!
//! - **1xx**: Informacional (no se usan en HTTP/1.0)
//! - **2xx**: Éxito (200 OK)
//! - **3xx**: Redirección
//! - **4xx**: Error del cliente (400, 404)
//! - **5xx**: Error del servidor (500)
//!
//! A diferencia de un enum cerrado, `StatusCode` envuelve un `u16` para que
//! el registro de errores pueda aceptar cualquier código.

/// Código de estado HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK - La petición fue exitosa
    pub const OK: StatusCode = StatusCode(200);

    /// 400 Bad Request - Método, query o variable de URL inválidos
    pub const BAD_REQUEST: StatusCode = StatusCode(400);

    /// 404 Not Found - Ruta o recurso no encontrado
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    /// 500 Internal Server Error - Fallo dentro de un handler
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Crea un código a partir de su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use http_router::http::StatusCode;
    /// assert_eq!(StatusCode::from_u16(404), StatusCode::NOT_FOUND);
    /// ```
    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Convierte el código a su valor numérico
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// Los códigos sin texto conocido se muestran como "Unknown".
    ///
    /// # Ejemplo
    /// ```
    /// use http_router::http::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Moved Temporarily",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::OK.as_u16(), 200);
        assert_eq!(StatusCode::BAD_REQUEST.as_u16(), 400);
        assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), 500);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::OK.reason_phrase(), "OK");
        assert_eq!(StatusCode::BAD_REQUEST.reason_phrase(), "Bad Request");
        assert_eq!(StatusCode::from_u16(503).reason_phrase(), "Service Unavailable");
    }

    #[test]
    fn test_unknown_code_phrase() {
        assert_eq!(StatusCode::from_u16(599).reason_phrase(), "Unknown");
        assert_eq!(StatusCode::from_u16(599).to_string(), "599 Unknown");
    }

    #[test]
    fn test_classes() {
        assert!(StatusCode::OK.is_success());
        assert!(!StatusCode::BAD_REQUEST.is_success());
        assert!(StatusCode::NOT_FOUND.is_client_error());
        assert!(!StatusCode::INTERNAL_SERVER_ERROR.is_client_error());
        assert!(StatusCode::INTERNAL_SERVER_ERROR.is_server_error());
        assert!(!StatusCode::BAD_REQUEST.is_server_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::OK.to_string(), "200 OK");
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.to_string(), "500 Internal Server Error");
    }
}
