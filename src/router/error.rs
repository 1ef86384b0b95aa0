//! # Errores de Registro y de URLs
//! src/router/error.rs

use crate::http::Method;
use thiserror::Error;

/// Errores al registrar rutas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Segmento con `<` o `>` que no es un token `<nombre>` / `<filtro:nombre>`
    #[error("Invalid variable token '{token}' in pattern {pattern}")]
    InvalidToken { pattern: String, token: String },

    /// Filtro no registrado
    #[error("Unknown filter '{filter}' in pattern {pattern}")]
    UnknownFilter { pattern: String, filter: String },

    /// La misma variable aparece dos veces en un patrón
    #[error("Variable '{name}' declared twice in pattern {pattern}")]
    DuplicateVariable { pattern: String, name: String },

    /// Ya hay un handler para ese patrón y método
    #[error("Route already registered: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },

    /// Ya hay un handler con ese nombre
    #[error("Handler name already registered: {0}")]
    DuplicateName(String),
}

/// Errores al construir una URL a partir de un handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    #[error("Missing value for URL variable '{variable}' of handler {handler}")]
    MissingVariable { handler: String, variable: String },

    /// Valor que no forma un único segmento de path
    #[error("Invalid value '{value}' for URL variable '{variable}' of handler {handler}")]
    InvalidValue {
        handler: String,
        variable: String,
        value: String,
    },
}
