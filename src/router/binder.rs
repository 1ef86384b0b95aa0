//! # Variables de URL
//! src/router/binder.rs
//!
//! Cada handler guarda, en orden de declaración, la lista de variables de su
//! patrón junto con el filtro que convierte el segmento capturado:
//!
//! ```text
//! /vars/<a>/<int:n>   →   [(string, "a"), (int, "n")]
//! ```
//!
//! Al despachar, los segmentos en posiciones de variable se emparejan uno a
//! uno con esa lista y se les aplica el filtro.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::tree::PatternSegment;

/// Valor tipado de una variable de URL
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Nombre del tipo, útil en mensajes y respuestas de ejemplo
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Función que convierte un segmento capturado en un valor tipado
pub type Filter = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Nombre del filtro usado cuando el token no indica ninguno
pub const DEFAULT_FILTER: &str = "string";

/// Registro de filtros por nombre
#[derive(Clone)]
pub struct Filters {
    by_name: HashMap<String, Filter>,
}

impl Filters {
    /// Crea el registro con los filtros `string`, `int` y `float`
    pub fn new() -> Self {
        let mut filters = Self {
            by_name: HashMap::new(),
        };
        filters.add(DEFAULT_FILTER, |raw| Ok(Value::Str(raw.to_string())));
        filters.add("int", |raw| {
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string())
        });
        filters.add("float", |raw| {
            raw.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string())
        });
        filters
    }

    /// Registra (o reemplaza) un filtro
    pub fn add<F>(&mut self, name: &str, filter: F)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.by_name.insert(name.to_string(), Arc::new(filter));
    }

    pub fn get(&self, name: &str) -> Option<Filter> {
        self.by_name.get(name).cloned()
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::new()
    }
}

/// Una variable declarada en un patrón
#[derive(Clone)]
pub struct VarSpec {
    /// Nombre de la variable (`a` en `<int:a>`)
    pub name: String,

    /// Nombre del filtro (`int` en `<int:a>`)
    pub filter_name: String,

    filter: Filter,
}

impl VarSpec {
    pub fn new(name: &str, filter_name: &str, filter: Filter) -> Self {
        Self {
            name: name.to_string(),
            filter_name: filter_name.to_string(),
            filter,
        }
    }

    /// Aplica el filtro al valor capturado
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        (self.filter)(raw)
    }
}

impl fmt::Debug for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarSpec")
            .field("name", &self.name)
            .field("filter_name", &self.filter_name)
            .finish()
    }
}

/// Variables de URL ya convertidas, por nombre
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: HashMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Valor de una variable de texto
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Valor de una variable entera
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

/// Falla de conversión de una variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    pub name: String,
    pub value: String,
    pub reason: String,
}

/// Empareja los segmentos del request con las variables del handler
///
/// `matched` es la secuencia de claves recorrida en el árbol (literal o
/// variable en cada profundidad) y `segments` los segmentos del path. Las
/// posiciones literales se descartan; las de variable se asignan en orden a
/// `vars`.
pub fn bind(matched: &[PatternSegment], segments: &[String], vars: &[VarSpec]) -> Result<Args, BindError> {
    let captured = matched
        .iter()
        .zip(segments)
        .filter(|(key, _)| key.is_var())
        .map(|(_, segment)| segment);

    let mut args = Args::new();
    for (spec, raw) in vars.iter().zip(captured) {
        let value = spec.coerce(raw).map_err(|reason| BindError {
            name: spec.name.clone(),
            value: raw.clone(),
            reason,
        })?;
        args.insert(&spec.name, value);
    }

    Ok(args)
}
