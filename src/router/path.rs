//! # Codec de Paths
//! src/router/path.rs
//!
//! Convierte entre un path de URL y su secuencia de segmentos.
//!
//! ```text
//! "/vars/a/rat/"  →  ["vars", "a", "rat"]  →  "/vars/a/rat"
//! ```

/// Separa un path en segmentos
///
/// Ignora separadores al inicio y al final, y segmentos vacíos (`//`).
///
/// # Ejemplo
/// ```
/// use http_router::router::path::path_to_segments;
///
/// assert_eq!(path_to_segments("/a/b/"), vec!["a", "b"]);
/// assert!(path_to_segments("/").is_empty());
/// ```
pub fn path_to_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Une segmentos en un path absoluto
///
/// Una secuencia vacía produce `"/"`.
pub fn segments_to_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
