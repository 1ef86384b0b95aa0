//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, una a la vez
//! 3. Lee y parsea el request HTTP
//! 4. Lo despacha y envía la respuesta
//! 5. Cierra la conexión

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{bind, Server};
