//! # Errores de Despacho
//! src/dispatch/error.rs
//!
//! Toda falla durante el despacho de un request termina como una variante
//! de `DispatchError`. El dispatcher la traduce a un código de estado y se
//! la pasa al registro de errores, así que el cliente siempre recibe una
//! respuesta HTTP normal.

use crate::http::StatusCode;
use thiserror::Error;

/// Fallas detectadas al despachar un request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Verbo fuera de GET/POST/PUT/DELETE
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Par de la query string sin `=`
    #[error("Malformed URL parameters: {0}")]
    MalformedQuery(String),

    /// Ninguna ruta coincide con el path y método
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Recurso estático registrado pero ausente en el almacenamiento
    #[error("Static resource not found: {0}")]
    ResourceNotFound(String),

    /// Un filtro rechazó el valor capturado
    #[error("Wrong type in URL variable '{name}': '{value}' ({reason})")]
    VariableCoercionFailed {
        name: String,
        value: String,
        reason: String,
    },

    /// Error o pánico dentro de un handler, o lectura fallida de un recurso
    #[error("Internal error: {0}")]
    HandlerFault(String),
}

impl DispatchError {
    /// Código de estado con el que se responde esta falla
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::InvalidMethod(_)
            | DispatchError::MalformedQuery(_)
            | DispatchError::VariableCoercionFailed { .. } => StatusCode::BAD_REQUEST,
            DispatchError::RouteNotFound { .. } | DispatchError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::HandlerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
