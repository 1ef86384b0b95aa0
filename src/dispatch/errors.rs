//! # Registro de Handlers de Error
//! src/dispatch/errors.rs
//!
//! Tabla código de estado → (handler, mimetype). Viene con handlers por
//! defecto para 400, 404 y 500 que responden el mensaje como texto plano;
//! cualquiera puede reemplazarse, y se pueden agregar códigos nuevos.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use crate::http::{response::DEFAULT_MIMETYPE, Response, StatusCode};

/// Función que construye la respuesta de un error a partir de un mensaje
pub type ErrorHandler = Box<dyn Fn(&str) -> Response + Send + Sync>;

struct Entry {
    handler: ErrorHandler,
    mimetype: String,
}

/// Registro de handlers de error
pub struct ErrorRegistry {
    entries: HashMap<StatusCode, Entry>,
}

impl ErrorRegistry {
    /// Crea el registro con los handlers por defecto
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };
        for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            registry.register(status, DEFAULT_MIMETYPE, move |message| default_response(status, message));
        }
        registry
    }

    /// Registra (o reemplaza) el handler de un código
    pub fn register<F>(&mut self, status: StatusCode, mimetype: &str, handler: F)
    where
        F: Fn(&str) -> Response + Send + Sync + 'static,
    {
        self.entries.insert(
            status,
            Entry {
                handler: Box::new(handler),
                mimetype: mimetype.to_string(),
            },
        );
    }

    /// Verifica si hay handler para un código
    pub fn contains(&self, status: StatusCode) -> bool {
        self.entries.contains_key(&status)
    }

    /// Construye la respuesta final para un error
    ///
    /// Si el handler no fija status se usa `status`; el mimetype siempre es
    /// el registrado. Un código sin handler, o un handler que entra en
    /// pánico, produce un 500 en texto plano.
    pub fn render(&self, status: StatusCode, message: &str) -> Response {
        let Some(entry) = self.entries.get(&status) else {
            return default_response(StatusCode::INTERNAL_SERVER_ERROR, message);
        };

        match panic::catch_unwind(AssertUnwindSafe(|| (entry.handler)(message))) {
            Ok(mut response) => {
                if response.status().is_none() {
                    response.set_status(status);
                }
                response.set_mimetype(&entry.mimetype);
                response
            }
            Err(_) => {
                tracing::error!(status = status.as_u16(), "error handler panicked");
                default_response(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Respuesta de texto con el mensaje, o la reason phrase si está vacío
fn default_response(status: StatusCode, message: &str) -> Response {
    let body = if message.is_empty() {
        status.reason_phrase()
    } else {
        message
    };
    Response::text(status, body)
}
