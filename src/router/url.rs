//! # Construcción inversa de URLs
//! src/router/url.rs
//!
//! A partir del patrón registrado de un handler y valores para sus
//! variables, reconstruye el path:
//!
//! ```text
//! one_var: /vars/<a>/rat   +   a=1   →   /vars/1/rat
//! ```

use super::binder::VarSpec;
use super::error::UrlError;
use super::path::segments_to_path;
use super::tree::PatternSegment;

/// Sustituye cada variable del patrón por el valor con su nombre
///
/// Los valores que no corresponden a ninguna variable se ignoran. Un valor
/// vacío o con `/` o `?` no ocuparía exactamente un segmento, así que es
/// un error.
pub fn build_url<V: ToString>(
    handler: &str,
    pattern: &[PatternSegment],
    vars: &[VarSpec],
    kwargs: &[(&str, V)],
) -> Result<String, UrlError> {
    let mut next_var = vars.iter();
    let mut parts = Vec::with_capacity(pattern.len());

    for segment in pattern {
        match segment {
            PatternSegment::Literal(literal) => parts.push(literal.clone()),
            PatternSegment::Var => {
                // parse_pattern garantiza una VarSpec por cada Var
                let Some(spec) = next_var.next() else {
                    break;
                };
                let value = kwargs
                    .iter()
                    .find(|(name, _)| *name == spec.name)
                    .map(|(_, value)| value.to_string())
                    .ok_or_else(|| UrlError::MissingVariable {
                        handler: handler.to_string(),
                        variable: spec.name.clone(),
                    })?;
                if value.is_empty() || value.contains(['/', '?']) {
                    return Err(UrlError::InvalidValue {
                        handler: handler.to_string(),
                        variable: spec.name.clone(),
                        value,
                    });
                }
                parts.push(value);
            }
        }
    }

    Ok(segments_to_path(&parts))
}
