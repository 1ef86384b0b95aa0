//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http_router --port 5000 --static-dir ./public --buffer-size 4096
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=5000 HTTP_HOST=0.0.0.0 RUST_LOG=http_router=debug ./http_router
//! ```

use clap::Parser;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "http_router")]
#[command(about = "Árbol de rutas y servidor HTTP/1.0 de una conexión a la vez")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio de donde se leen los recursos estáticos
    #[arg(long = "static-dir", default_value = "./static", env = "STATIC_DIR")]
    pub static_dir: String,

    /// Valor del header `Server`
    #[arg(long = "server-name", default_value = "http_router/0.1", env = "SERVER_NAME")]
    pub server_name: String,

    /// Bytes leídos de cada conexión (una sola lectura por request)
    #[arg(long = "buffer-size", default_value = "8192", env = "BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Filtro de logs en formato `tracing_subscriber::EnvFilter`
    #[arg(long = "log-filter", default_value = "http_router=info", env = "RUST_LOG")]
    pub log_filter: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_router::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.buffer_size < 64 {
            return Err("Buffer size must be >= 64 bytes".to_string());
        }
        if self.server_name.trim().is_empty() {
            return Err("Server name must not be empty".to_string());
        }
        if self.server_name.contains('\r') || self.server_name.contains('\n') {
            return Err("Server name must be a single line".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            static_dir: "./static".to_string(),
            server_name: "http_router/0.1".to_string(),
            buffer_size: 8192,
            log_filter: "http_router=info".to_string(),
        }
    }
}
