//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP/1.0 desde cero.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /vars/a/b?param1=value1&param2=value2 HTTP/1.0\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! body de una sola línea
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.0`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Solo la primera línea después de la línea vacía
//!
//! El parser no valida el método: eso lo hace el dispatcher, que responde
//! 400 a verbos desconocidos. Tampoco interpreta la query string; solo la
//! separa del path.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Métodos HTTP que el dispatcher acepta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// PUT - Reemplazar un recurso
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP tal como llegó (se valida en el dispatcher)
    method: String,

    /// Path de la petición sin query (ej: "/vars/a/rat")
    path: String,

    /// Query string cruda, si la hay (ej: "a=1&b=2")
    query: Option<String>,

    /// Parámetros de la query, llenados por el dispatcher
    args: HashMap<String, String>,

    /// Headers HTTP (ej: {"Host": "localhost:8080"})
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body del request
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// Bytes que no son UTF-8
    #[error("Request is not valid UTF-8")]
    InvalidEncoding,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Versión HTTP no soportada
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl Request {
    /// Crea un request sin headers ni body
    ///
    /// El path puede traer query string (`/params?a=1`); se separa igual
    /// que en [`Request::parse`].
    ///
    /// # Ejemplo
    /// ```
    /// use http_router::http::Request;
    ///
    /// let request = Request::new("GET", "/params?a=hello");
    /// assert_eq!(request.path(), "/params");
    /// assert_eq!(request.query(), Some("a=hello"));
    /// ```
    pub fn new(method: &str, target: &str) -> Self {
        let (path, query) = Self::split_target(target);
        Self {
            method: method.to_string(),
            path,
            query,
            args: HashMap::new(),
            headers: HashMap::new(),
            version: "HTTP/1.0".to_string(),
            body: Vec::new(),
        }
    }

    /// Reemplaza la query string
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = if query.is_empty() { None } else { Some(query.to_string()) };
        self
    }

    /// Reemplaza el body
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    /// Agrega un header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_router::http::Request;
    ///
    /// let raw = b"GET /integer/6?debug=1 HTTP/1.0\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/integer/6");
    /// assert_eq!(request.query(), Some("debug=1"));
    /// assert_eq!(request.header("Host"), Some("x"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let request_str = std::str::from_utf8(buffer).map_err(|_| ParseError::InvalidEncoding)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let lines: Vec<&str> = request_str.split("\r\n").collect();

        // 1. Request line
        let (method, target, version) = Self::parse_request_line(lines[0])?;

        // 2. Headers hasta la primera línea vacía
        let (headers, blank_at) = Self::parse_headers(&lines[1..])?;

        // 3. Body: una sola línea
        let body = blank_at
            .and_then(|i| lines.get(i + 2))
            .map(|line| line.trim().as_bytes().to_vec())
            .unwrap_or_default();

        let (path, query) = Self::split_target(target);

        Ok(Request {
            method: method.to_string(),
            path,
            query,
            args: HashMap::new(),
            headers,
            version: version.to_string(),
            body,
        })
    }

    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = parts[2];
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((parts[0], parts[1], version))
    }

    /// Parsea los headers. Retorna también el índice (relativo a `lines`)
    /// de la línea vacía, si apareció.
    fn parse_headers(lines: &[&str]) -> Result<(HashMap<String, String>, Option<usize>), ParseError> {
        let mut headers = HashMap::new();

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                return Ok((headers, Some(i)));
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok((headers, None))
    }

    /// Separa "/path?query" en ("/path", Some("query"))
    fn split_target(target: &str) -> (String, Option<String>) {
        match target.split_once('?') {
            Some((path, query)) if !query.is_empty() => (path.to_string(), Some(query.to_string())),
            Some((path, _)) => (path.to_string(), None),
            None => (target.to_string(), None),
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP tal como llegó
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la query string cruda
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Obtiene todos los parámetros de la query
    pub fn args(&self) -> &HashMap<String, String> {
        &self.args
    }

    /// Obtiene un parámetro de la query
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(|s| s.as_str())
    }

    /// Usado por el dispatcher al validar la query
    pub(crate) fn set_args(&mut self, args: HashMap<String, String>) {
        self.args = args;
    }

    /// Usado por las redirecciones internas
    pub(crate) fn set_target(&mut self, target: &str) {
        let (path, query) = Self::split_target(target);
        self.path = path;
        self.query = query;
        self.args.clear();
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}
