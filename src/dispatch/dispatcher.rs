//! # Dispatcher
//! src/dispatch/dispatcher.rs
//!
//! Ciclo de vida de un request:
//!
//! ```text
//! VALIDATE ──▶ STATIC ───┐
//!     │                   ├──▶ RESPONSE
//!     └─────▶ ENDPOINT ──┘
//!
//! cualquier falla ──▶ ErrorRegistry ──▶ RESPONSE
//! ```
//!
//! 1. **VALIDATE**: el método debe ser GET/POST/PUT/DELETE y la query, si
//!    existe, debe ser una lista de pares `clave=valor` separados por `&`.
//! 2. **STATIC**: si el path es un recurso estático se sirve (desde caché si
//!    ya se leyó antes).
//! 3. **ENDPOINT**: se busca en el árbol, se convierten las variables y se
//!    invoca el handler. El mimetype de la respuesta se reemplaza por el de
//!    la ruta y, si el handler no fijó status, se usa 200.
//!
//! Errores y pánicos de un handler se capturan aquí y se responden como 500;
//! ningún request puede tirar abajo el servidor.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use url::form_urlencoded;

use super::context::Context;
use super::error::DispatchError;
use super::errors::ErrorRegistry;
use super::statics::{ResourceStore, StaticFiles, StaticTable};
use crate::http::{Method, Request, Response, StatusCode};
use crate::router::path::{path_to_segments, segments_to_path};
use crate::router::{Route, RouteTable, UrlError};

/// Aplicación lista para atender requests
///
/// Solo lectura salvo por la caché de recursos estáticos, que tiene su
/// propio lock; puede compartirse entre threads.
pub struct Dispatcher {
    name: String,
    routes: RouteTable,
    statics: StaticFiles,
    errors: ErrorRegistry,
}

impl Dispatcher {
    pub(crate) fn new(
        name: String,
        routes: RouteTable,
        statics: StaticTable,
        store: Box<dyn ResourceStore>,
        errors: ErrorRegistry,
    ) -> Self {
        Self {
            name,
            routes,
            statics: StaticFiles::new(statics, store),
            errors,
        }
    }

    /// Nombre de la aplicación
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recursos estáticos y su caché
    pub fn statics(&self) -> &StaticFiles {
        &self.statics
    }

    /// Atiende un request y siempre produce una respuesta
    pub fn dispatch(&self, request: Request) -> Response {
        self.dispatch_nested(request, 0)
    }

    /// Igual que [`Dispatcher::dispatch`], para redirecciones internas
    pub(crate) fn dispatch_nested(&self, mut request: Request, depth: usize) -> Response {
        match self.try_dispatch(&mut request, depth) {
            Ok(response) => response,
            Err(err) => {
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!(method = request.method(), path = request.path(), error = %err, "request failed");
                } else {
                    tracing::debug!(method = request.method(), path = request.path(), error = %err, "request rejected");
                }
                self.render_error(status, &err.to_string())
            }
        }
    }

    /// Respuesta del registro de errores para `status`
    ///
    /// También la usa el servidor cuando un request no se puede parsear.
    pub fn render_error(&self, status: StatusCode, message: &str) -> Response {
        self.errors.render(status, message)
    }

    /// Construye la URL de un handler registrado
    ///
    /// # Ejemplo
    /// ```
    /// use http_router::router::Router;
    /// use http_router::http::Response;
    /// use http_router::dispatch::FsStore;
    ///
    /// let mut router = Router::new();
    /// router.get("one_var", "/vars/<a>/rat", |_| Ok(Response::new())).unwrap();
    /// let app = router.build(FsStore::new("."));
    ///
    /// assert_eq!(app.url_for("one_var", &[("a", 1)]).unwrap(), "/vars/1/rat");
    /// ```
    pub fn url_for<V: ToString>(&self, handler: &str, kwargs: &[(&str, V)]) -> Result<String, UrlError> {
        self.routes.url_for(handler, kwargs)
    }

    fn try_dispatch(&self, request: &mut Request, depth: usize) -> Result<Response, DispatchError> {
        // VALIDATE
        let method = validate_method(request.method())?;
        if let Some(query) = request.query() {
            let args = parse_query(query)?;
            request.set_args(args);
        }

        let segments = path_to_segments(request.path());

        // STATIC
        if let Some(response) = self.statics.serve(&segments_to_path(&segments))? {
            return Ok(response);
        }

        // ENDPOINT
        let (route, args) = self.routes.resolve(&segments, method)?;
        let ctx = Context::new(request, &args, self, depth);
        let mut response = invoke(route, &ctx)?;

        response.set_mimetype(route.mimetype());
        if response.status().is_none() {
            response.set_status(StatusCode::OK);
        }
        Ok(response)
    }
}

fn validate_method(method: &str) -> Result<Method, DispatchError> {
    method
        .parse::<Method>()
        .map_err(DispatchError::InvalidMethod)
}

/// Parsea `a=1&b=2` en un mapa, decodificando claves y valores
///
/// Segmentos vacíos (`a=1&&b=2`) se ignoran; un segmento sin `=` es un
/// error.
fn parse_query(query: &str) -> Result<HashMap<String, String>, DispatchError> {
    if query.split('&').any(|pair| !pair.is_empty() && !pair.contains('=')) {
        return Err(DispatchError::MalformedQuery(query.to_string()));
    }

    Ok(form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}

/// Invoca el handler convirtiendo errores y pánicos en `HandlerFault`
fn invoke(route: &Route, ctx: &Context<'_>) -> Result<Response, DispatchError> {
    match panic::catch_unwind(AssertUnwindSafe(|| route.invoke(ctx))) {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(err)) => Err(DispatchError::HandlerFault(format!("handler {} failed: {}", route.name(), err))),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(DispatchError::HandlerFault(format!("handler {} panicked: {}", route.name(), reason)))
        }
    }
}
