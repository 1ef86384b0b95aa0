//! # HTTP Router
//! src/lib.rs
//!
//! Árbol de rutas por segmentos y servidor HTTP/1.0 bloqueante, implementados
//! desde cero: variables de URL con filtros de tipo, recursos estáticos,
//! handlers de error por código y construcción inversa de URLs.
//!
//! ## Arquitectura
//!
//! El crate está dividido en módulos especializados:
//! - `http`: Parsing de requests y serialización de responses HTTP/1.0
//! - `router`: Registro de rutas, árbol de segmentos, variables y URLs
//! - `dispatch`: Ciclo de vida de un request y manejo de errores
//! - `server`: Loop de aceptación TCP, una conexión a la vez
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http_router::config::Config;
//! use http_router::dispatch::FsStore;
//! use http_router::http::Response;
//! use http_router::router::Router;
//! use http_router::server::Server;
//!
//! let mut router = Router::new().with_name("demo");
//! router
//!     .get("hello", "/hello/<name>", |ctx| {
//!         let name = ctx.args().str("name").unwrap_or("world");
//!         Ok(Response::new().with_body(&format!("hello {}", name)))
//!     })
//!     .expect("valid route");
//!
//! let config = Config::default();
//! let app = router.build(FsStore::new(&config.static_dir));
//! Server::new(config, app).run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod dispatch;
pub mod http;
pub mod router;
pub mod server;
