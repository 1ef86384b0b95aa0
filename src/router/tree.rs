//! # Árbol de Rutas
//! src/router/tree.rs
//!
//! Árbol de segmentos guardado en un arena (`Vec<Node>`). Cada nodo tiene
//! hijos literales, a lo sumo un hijo variable, y un slot por método con el
//! handler que termina en ese nodo.
//!
//! ```text
//! (raíz)
//!  └─ "vars"
//!      ├─ "large" ─ "rat"        [GET → literal_rat]
//!      └─ <VAR>
//!          ├─ "rat"              [GET → one_var]
//!          └─ <VAR> ─ "not" ─ <VAR>  [GET → three_vars]
//! ```
//!
//! En cada profundidad se prefiere el hijo literal y solo si no existe se
//! baja por el variable. No hay backtracking: una vez elegida una rama no se
//! prueba la otra.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::binder::{Filters, VarSpec, DEFAULT_FILTER};
use super::error::RouteError;
use super::path::path_to_segments;
use super::HandlerId;
use crate::http::Method;

/// Segmento de un patrón registrado, o clave recorrida en una búsqueda
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    /// Marcador de variable: acepta cualquier segmento
    Var,
}

impl PatternSegment {
    pub fn is_var(&self) -> bool {
        matches!(self, PatternSegment::Var)
    }
}

/// `<nombre>` o `<filtro:nombre>`
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"^<(?:(?P<filter>[A-Za-z_][A-Za-z0-9_]*):)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)>$")
            .expect("route token regex is valid")
    })
}

/// Descompone un patrón en segmentos y variables
///
/// Las variables se devuelven en orden de declaración; la i-ésima
/// corresponde al i-ésimo `Var` de los segmentos.
pub fn parse_pattern(pattern: &str, filters: &Filters) -> Result<(Vec<PatternSegment>, Vec<VarSpec>), RouteError> {
    let mut segments = Vec::new();
    let mut vars: Vec<VarSpec> = Vec::new();

    for raw in path_to_segments(pattern) {
        if !raw.contains('<') && !raw.contains('>') {
            segments.push(PatternSegment::Literal(raw));
            continue;
        }

        let caps = token_regex().captures(&raw).ok_or_else(|| RouteError::InvalidToken {
            pattern: pattern.to_string(),
            token: raw.clone(),
        })?;

        let name = &caps["name"];
        let filter_name = caps.name("filter").map_or(DEFAULT_FILTER, |m| m.as_str());

        let filter = filters.get(filter_name).ok_or_else(|| RouteError::UnknownFilter {
            pattern: pattern.to_string(),
            filter: filter_name.to_string(),
        })?;

        if vars.iter().any(|v| v.name == name) {
            return Err(RouteError::DuplicateVariable {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }

        vars.push(VarSpec::new(name, filter_name, filter));
        segments.push(PatternSegment::Var);
    }

    Ok((segments, vars))
}

/// Handler asociado a un nodo terminal para un método
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub handler: HandlerId,
    pub mimetype: String,
}

#[derive(Debug, Default)]
struct Node {
    literals: HashMap<String, usize>,
    var: Option<usize>,
    bindings: HashMap<Method, Binding>,
}

/// Resultado de una búsqueda exitosa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    pub binding: &'a Binding,
    /// Clave elegida en cada profundidad
    pub matched: Vec<PatternSegment>,
}

/// Árbol de rutas
#[derive(Debug)]
pub struct RouteTree {
    nodes: Vec<Node>,
}

impl RouteTree {
    /// Crea un árbol con solo la raíz
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Inserta un handler al final del camino `pattern` para `method`
    ///
    /// Falla si ya existe un handler para ese camino y método.
    pub fn insert(&mut self, pattern: &[PatternSegment], method: Method, binding: Binding) -> Result<(), RouteError> {
        let mut current = 0;

        for segment in pattern {
            current = match segment {
                PatternSegment::Literal(literal) => match self.nodes[current].literals.get(literal) {
                    Some(&child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[current].literals.insert(literal.clone(), child);
                        child
                    }
                },
                PatternSegment::Var => match self.nodes[current].var {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[current].var = Some(child);
                        child
                    }
                },
            };
        }

        let node = &mut self.nodes[current];
        if node.bindings.contains_key(&method) {
            return Err(RouteError::DuplicateRoute {
                method,
                pattern: render_pattern(pattern),
            });
        }
        node.bindings.insert(method, binding);
        Ok(())
    }

    /// Busca el handler para los segmentos de un path y un método
    ///
    /// Retorna `None` si el camino no existe o si el nodo final no tiene
    /// handler para ese método.
    pub fn lookup(&self, segments: &[String], method: Method) -> Option<Match<'_>> {
        let mut current = 0;
        let mut matched = Vec::with_capacity(segments.len());

        for segment in segments {
            let node = &self.nodes[current];
            if let Some(&child) = node.literals.get(segment) {
                matched.push(PatternSegment::Literal(segment.clone()));
                current = child;
            } else if let Some(child) = node.var {
                matched.push(PatternSegment::Var);
                current = child;
            } else {
                return None;
            }
        }

        self.nodes[current]
            .bindings
            .get(&method)
            .map(|binding| Match { binding, matched })
    }

    /// Cantidad de nodos, incluyendo la raíz
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn push_node(&mut self) -> usize {
        self.nodes.push(Node::default());
        self.nodes.len() - 1
    }
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Forma de un patrón con `<>` en lugar de los nombres de variables
fn render_pattern(pattern: &[PatternSegment]) -> String {
    let parts: Vec<&str> = pattern
        .iter()
        .map(|segment| match segment {
            PatternSegment::Literal(literal) => literal.as_str(),
            PatternSegment::Var => "<>",
        })
        .collect();
    super::path::segments_to_path(&parts)
}
