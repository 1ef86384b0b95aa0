//! # Contexto de un Handler
//! src/dispatch/context.rs
//!
//! Lo que recibe un handler al ser invocado: el request, las variables de
//! URL ya convertidas, y acceso de solo lectura a la aplicación (nombre,
//! construcción de URLs y redirecciones internas).

use super::dispatcher::Dispatcher;
use crate::http::{Request, Response};
use crate::router::{Args, UrlError, Value};

/// Error que puede retornar un handler; se responde como 500
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Resultado de un handler
pub type HandlerResult = Result<Response, HandlerError>;

/// Función handler de un endpoint
pub type Handler = Box<dyn Fn(&Context<'_>) -> HandlerResult + Send + Sync>;

/// Máximo de redirecciones internas encadenadas
pub const MAX_REDIRECTS: usize = 8;

/// Contexto de una invocación
pub struct Context<'a> {
    request: &'a Request,
    args: &'a Args,
    dispatcher: &'a Dispatcher,
    depth: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn new(request: &'a Request, args: &'a Args, dispatcher: &'a Dispatcher, depth: usize) -> Self {
        Self {
            request,
            args,
            dispatcher,
            depth,
        }
    }

    /// Request que se está atendiendo
    pub fn request(&self) -> &Request {
        self.request
    }

    /// Variables de URL
    pub fn args(&self) -> &Args {
        self.args
    }

    /// Una variable de URL
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Nombre de la aplicación
    pub fn app_name(&self) -> &str {
        self.dispatcher.name()
    }

    /// Construye la URL de otro handler; ver [`Dispatcher::url_for`]
    pub fn url_for<V: ToString>(&self, handler: &str, kwargs: &[(&str, V)]) -> Result<String, UrlError> {
        self.dispatcher.url_for(handler, kwargs)
    }

    /// Despacha internamente el mismo request hacia otro path
    ///
    /// Retorna la respuesta del destino tal cual, incluidas las respuestas de
    /// error. Pasadas [`MAX_REDIRECTS`] redirecciones encadenadas falla.
    pub fn redirect(&self, target: &str) -> HandlerResult {
        if self.depth >= MAX_REDIRECTS {
            return Err(format!("too many internal redirects (last target {})", target).into());
        }

        let mut request = self.request.clone();
        request.set_target(target);
        tracing::debug!(from = self.request.path(), to = target, "internal redirect");
        Ok(self.dispatcher.dispatch_nested(request, self.depth + 1))
    }
}
