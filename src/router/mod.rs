//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el registro de rutas y su resolución.
//!
//! ## Arquitectura
//!
//! ```text
//! Router (registro) ──build──▶ Dispatcher
//!   ├─ RouteTable: árbol de segmentos + handlers + variables
//!   ├─ Filters: conversión de variables (<int:n>, <list:xs>, ...)
//!   ├─ StaticTable: URLs fijas → recursos
//!   └─ ErrorRegistry: código → handler de error
//! ```
//!
//! Un patrón se compone de segmentos literales y tokens `<nombre>` o
//! `<filtro:nombre>`. Al resolver un path, los literales tienen prioridad
//! sobre las variables en cada profundidad.
//!
//! ## Ejemplo
//!
//! ```
//! use http_router::router::Router;
//! use http_router::http::{Request, Response, StatusCode};
//! use http_router::dispatch::FsStore;
//!
//! let mut router = Router::new();
//! router
//!     .get("one_var", "/vars/<a>/rat", |ctx| {
//!         let a = ctx.arg("a").map(|v| v.to_string()).unwrap_or_default();
//!         Ok(Response::new().with_body(&format!("{} rat", a)))
//!     })
//!     .unwrap();
//!
//! assert_eq!(router.url_for("one_var", &[("a", 1)]).unwrap(), "/vars/1/rat");
//!
//! let app = router.build(FsStore::new("."));
//! let response = app.dispatch(Request::new("GET", "/vars/large/rat"));
//! assert_eq!(response.status(), Some(StatusCode::OK));
//! assert_eq!(response.body(), b"large rat");
//! ```

pub mod binder;
pub mod error;
pub mod path;
pub mod tree;
pub mod url;

use std::collections::HashMap;

pub use binder::{Args, Filters, Value};
pub use error::{RouteError, UrlError};

use crate::dispatch::context::{Context, Handler, HandlerResult};
use crate::dispatch::errors::ErrorRegistry;
use crate::dispatch::statics::{guess_mimetype, ResourceStore, StaticTable};
use crate::dispatch::{DispatchError, Dispatcher};
use crate::http::response::DEFAULT_MIMETYPE;
use crate::http::{Method, Response, StatusCode};
use binder::VarSpec;
use tree::{Binding, PatternSegment, RouteTree};

/// Identificador estable de un handler, asignado al registrarlo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) usize);

/// Un endpoint registrado
pub struct Route {
    name: String,
    method: Method,
    pattern: Vec<PatternSegment>,
    vars: Vec<VarSpec>,
    mimetype: String,
    handler: Handler,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    pub(crate) fn invoke(&self, ctx: &Context<'_>) -> HandlerResult {
        (self.handler)(ctx)
    }
}

/// Rutas registradas: árbol + handlers + nombres
#[derive(Default)]
pub struct RouteTable {
    tree: RouteTree,
    routes: Vec<Route>,
    by_name: HashMap<String, HandlerId>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &mut self,
        name: &str,
        pattern: Vec<PatternSegment>,
        vars: Vec<VarSpec>,
        method: Method,
        mimetype: &str,
        handler: Handler,
    ) -> Result<HandlerId, RouteError> {
        if self.by_name.contains_key(name) {
            return Err(RouteError::DuplicateName(name.to_string()));
        }

        let id = HandlerId(self.routes.len());
        self.tree.insert(
            &pattern,
            method,
            Binding {
                handler: id,
                mimetype: mimetype.to_string(),
            },
        )?;

        self.by_name.insert(name.to_string(), id);
        self.routes.push(Route {
            name: name.to_string(),
            method,
            pattern,
            vars,
            mimetype: mimetype.to_string(),
            handler,
        });
        Ok(id)
    }

    /// Resuelve un path ya separado en segmentos y convierte sus variables
    pub fn resolve(&self, segments: &[String], method: Method) -> Result<(&Route, Args), DispatchError> {
        let found = self
            .tree
            .lookup(segments, method)
            .ok_or_else(|| DispatchError::RouteNotFound {
                method: method.to_string(),
                path: path::segments_to_path(segments),
            })?;

        let route = &self.routes[found.binding.handler.0];
        let args = binder::bind(&found.matched, segments, &route.vars).map_err(|e| {
            DispatchError::VariableCoercionFailed {
                name: e.name,
                value: e.value,
                reason: e.reason,
            }
        })?;

        Ok((route, args))
    }

    /// Construye la URL del handler `name` con los valores dados
    pub fn url_for<V: ToString>(&self, name: &str, kwargs: &[(&str, V)]) -> Result<String, UrlError> {
        let id = self
            .by_name
            .get(name)
            .ok_or_else(|| UrlError::UnknownHandler(name.to_string()))?;
        let route = &self.routes[id.0];
        url::build_url(name, &route.pattern, &route.vars, kwargs)
    }

    pub fn get(&self, id: HandlerId) -> Option<&Route> {
        self.routes.get(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<HandlerId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Registro de la aplicación, previo a servir
pub struct Router {
    name: String,
    routes: RouteTable,
    filters: Filters,
    statics: StaticTable,
    errors: ErrorRegistry,
}

impl Router {
    /// Crea un router vacío con los filtros y handlers de error por defecto
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
            routes: RouteTable::new(),
            filters: Filters::new(),
            statics: StaticTable::new(),
            errors: ErrorRegistry::new(),
        }
    }

    /// Fija el nombre de la aplicación
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Registra un filtro para usar en tokens `<filtro:nombre>`
    ///
    /// Debe registrarse antes que las rutas que lo usan.
    pub fn add_filter<F>(&mut self, name: &str, filter: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.filters.add(name, filter);
        self
    }

    /// Registra un handler
    ///
    /// `name` identifica al handler para [`Router::url_for`]. Falla si el
    /// patrón es inválido, usa un filtro desconocido, o si ya hay un handler
    /// con ese nombre o para ese patrón y método.
    pub fn register<F>(
        &mut self,
        name: &str,
        pattern: &str,
        method: Method,
        mimetype: &str,
        handler: F,
    ) -> Result<HandlerId, RouteError>
    where
        F: Fn(&Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let (segments, vars) = tree::parse_pattern(pattern, &self.filters)?;
        let id = self
            .routes
            .insert(name, segments, vars, method, mimetype, Box::new(handler))?;
        tracing::debug!(handler = name, %method, pattern, mimetype, "route registered");
        Ok(id)
    }

    /// Registra un handler GET con mimetype `text/plain`
    pub fn get<F>(&mut self, name: &str, pattern: &str, handler: F) -> Result<HandlerId, RouteError>
    where
        F: Fn(&Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(name, pattern, Method::GET, DEFAULT_MIMETYPE, handler)
    }

    /// Registra un handler POST con mimetype `text/plain`
    pub fn post<F>(&mut self, name: &str, pattern: &str, handler: F) -> Result<HandlerId, RouteError>
    where
        F: Fn(&Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(name, pattern, Method::POST, DEFAULT_MIMETYPE, handler)
    }

    /// Registra un handler PUT con mimetype `text/plain`
    pub fn put<F>(&mut self, name: &str, pattern: &str, handler: F) -> Result<HandlerId, RouteError>
    where
        F: Fn(&Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(name, pattern, Method::PUT, DEFAULT_MIMETYPE, handler)
    }

    /// Registra un handler DELETE con mimetype `text/plain`
    pub fn delete<F>(&mut self, name: &str, pattern: &str, handler: F) -> Result<HandlerId, RouteError>
    where
        F: Fn(&Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(name, pattern, Method::DELETE, DEFAULT_MIMETYPE, handler)
    }

    /// Sirve `resource` del almacenamiento en la URL fija `url_path`
    pub fn static_file(&mut self, url_path: &str, resource: &str, mimetype: &str) -> &mut Self {
        let url_path = path::segments_to_path(&path::path_to_segments(url_path));
        self.statics.insert(&url_path, resource, mimetype);
        self
    }

    /// Sirve `resource` en `/static/<resource>`, adivinando el mimetype
    pub fn static_resource(&mut self, resource: &str) -> &mut Self {
        let url_path = format!("/static/{}", resource);
        self.static_file(&url_path, resource, guess_mimetype(resource))
    }

    /// Registra (o reemplaza) el handler de error para `status`
    pub fn on_error<F>(&mut self, status: StatusCode, mimetype: &str, handler: F) -> &mut Self
    where
        F: Fn(&str) -> Response + Send + Sync + 'static,
    {
        self.errors.register(status, mimetype, handler);
        self
    }

    /// Construye la URL de un handler ya registrado
    pub fn url_for<V: ToString>(&self, name: &str, kwargs: &[(&str, V)]) -> Result<String, UrlError> {
        self.routes.url_for(name, kwargs)
    }

    /// Termina el registro y crea el dispatcher
    pub fn build<S: ResourceStore + 'static>(self, store: S) -> Dispatcher {
        tracing::info!(
            app = %self.name,
            routes = self.routes.len(),
            statics = self.statics.len(),
            "application built"
        );
        Dispatcher::new(self.name, self.routes, self.statics, Box::new(store), self.errors)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
