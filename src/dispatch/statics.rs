//! # Recursos Estáticos
//! src/dispatch/statics.rs
//!
//! Tabla URL → (nombre del recurso, mimetype). Los bytes se leen del
//! almacenamiento la primera vez que se piden y quedan en caché durante toda
//! la vida del proceso; la caché nunca se invalida.
//!
//! Cada recurso tiene su propio lock, que se mantiene durante la primera
//! lectura: dos requests concurrentes al mismo recurso no lo leen dos veces,
//! y una lectura lenta no bloquea los aciertos de caché de otros recursos.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::error::DispatchError;
use crate::http::{Response, StatusCode};

/// Acceso de solo lectura a los bytes de un recurso
pub trait ResourceStore: Send + Sync {
    /// Lee el recurso completo. `io::ErrorKind::NotFound` indica que no existe.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

impl<T: ResourceStore + ?Sized> ResourceStore for Arc<T> {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        (**self).read(name)
    }
}

/// Recursos leídos desde un directorio del sistema de archivos
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceStore for FsStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(name))
    }
}

/// Adivina el mimetype a partir de la extensión
///
/// # Ejemplo
/// ```
/// use http_router::dispatch::statics::guess_mimetype;
///
/// assert_eq!(guess_mimetype("index.html"), "text/html");
/// assert_eq!(guess_mimetype("LICENSE"), "application/octet-stream");
/// ```
pub fn guess_mimetype(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") | Some("py") | Some("rs") | Some("md") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
struct StaticEntry {
    resource: String,
    mimetype: String,
}

/// Tabla de recursos estáticos, armada durante el registro
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    entries: HashMap<String, StaticEntry>,
}

impl StaticTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asocia una URL con un recurso. Reemplaza una entrada previa.
    pub fn insert(&mut self, url_path: &str, resource: &str, mimetype: &str) {
        self.entries.insert(
            url_path.to_string(),
            StaticEntry {
                resource: resource.to_string(),
                mimetype: mimetype.to_string(),
            },
        );
    }

    pub fn contains(&self, url_path: &str) -> bool {
        self.entries.contains_key(url_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bytes de un recurso; `None` hasta la primera lectura exitosa
type Slot = Arc<Mutex<Option<Arc<Vec<u8>>>>>;

/// Tabla de recursos + almacenamiento + caché
pub struct StaticFiles {
    table: StaticTable,
    store: Box<dyn ResourceStore>,
    cache: Mutex<HashMap<String, Slot>>,
}

impl StaticFiles {
    pub fn new(table: StaticTable, store: Box<dyn ResourceStore>) -> Self {
        Self {
            table,
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Sirve la URL si es un recurso estático
    ///
    /// Retorna `Ok(None)` si la URL no está en la tabla.
    pub fn serve(&self, url_path: &str) -> Result<Option<Response>, DispatchError> {
        let Some(entry) = self.table.entries.get(url_path) else {
            return Ok(None);
        };

        let bytes = self.load(&entry.resource)?;
        let response = Response::new()
            .with_status(StatusCode::OK)
            .with_mimetype(&entry.mimetype)
            .with_body_bytes(bytes.as_ref().clone());
        Ok(Some(response))
    }

    fn load(&self, resource: &str) -> Result<Arc<Vec<u8>>, DispatchError> {
        // El mapa solo se bloquea para obtener el slot del recurso
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(cache.entry(resource.to_string()).or_default())
        };

        // Los slots solo pasan de None a Some: un lock envenenado sigue siendo consistente
        let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(bytes) = slot.as_ref() {
            tracing::trace!(resource, "static cache hit");
            return Ok(Arc::clone(bytes));
        }

        let bytes = self.store.read(resource).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DispatchError::ResourceNotFound(resource.to_string()),
            _ => DispatchError::HandlerFault(format!("reading static resource {}: {}", resource, e)),
        })?;

        tracing::debug!(resource, bytes = bytes.len(), "static resource loaded");
        let bytes = Arc::new(bytes);
        *slot = Some(Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Cantidad de recursos en caché; no cuenta los que se están leyendo
    pub fn cached(&self) -> usize {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .values()
            .filter(|slot| matches!(slot.try_lock().as_deref(), Ok(Some(_))))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Almacenamiento en memoria que cuenta las lecturas
    struct CountingStore {
        files: HashMap<String, Vec<u8>>,
        reads: AtomicUsize,
    }

    impl CountingStore {
        fn with(name: &str, data: &[u8]) -> Arc<Self> {
            let mut files = HashMap::new();
            files.insert(name.to_string(), data.to_vec());
            Arc::new(Self {
                files,
                reads: AtomicUsize::new(0),
            })
        }
    }

    impl ResourceStore for CountingStore {
        fn read(&self, name: &str) -> io::Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    struct BrokenStore;

    impl ResourceStore for BrokenStore {
        fn read(&self, _name: &str) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_serve_and_cache() {
        let store = CountingStore::with("app.css", b"body {}");
        let mut table = StaticTable::new();
        table.insert("/static/app.css", "app.css", "text/css");
        let files = StaticFiles::new(table, Box::new(Arc::clone(&store)));

        let first = files.serve("/static/app.css").unwrap().unwrap();
        assert_eq!(first.status(), Some(StatusCode::OK));
        assert_eq!(first.mimetype(), "text/css");
        assert_eq!(first.body(), b"body {}");

        let second = files.serve("/static/app.css").unwrap().unwrap();
        assert_eq!(second.body(), b"body {}");
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(files.cached(), 1);
    }

    #[test]
    fn test_not_static() {
        let files = StaticFiles::new(StaticTable::new(), Box::new(BrokenStore));
        assert!(files.serve("/anything").unwrap().is_none());
    }

    #[test]
    fn test_missing_resource() {
        let store = CountingStore::with("other", b"");
        let mut table = StaticTable::new();
        table.insert("/static/gone.txt", "gone.txt", "text/plain");
        let files = StaticFiles::new(table, Box::new(store));

        let err = files.serve("/static/gone.txt").unwrap_err();
        assert_eq!(err, DispatchError::ResourceNotFound("gone.txt".to_string()));
        assert_eq!(files.cached(), 0);
    }

    #[test]
    fn test_unreadable_resource() {
        let mut table = StaticTable::new();
        table.insert("/static/x", "x", "text/plain");
        let files = StaticFiles::new(table, Box::new(BrokenStore));

        let err = files.serve("/static/x").unwrap_err();
        assert!(matches!(err, DispatchError::HandlerFault(_)));
    }

    /// Almacenamiento cuya lectura de `slow` espera una señal
    struct GateStore {
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ResourceStore for GateStore {
        fn read(&self, name: &str) -> io::Result<Vec<u8>> {
            if name == "slow" {
                self.started.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            Ok(name.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_slow_read_does_not_block_other_resources() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = GateStore {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };

        let mut table = StaticTable::new();
        table.insert("/slow", "slow", "text/plain");
        table.insert("/fast", "fast", "text/plain");
        let files = Arc::new(StaticFiles::new(table, Box::new(store)));

        // Primer acceso a /fast: queda en caché
        files.serve("/fast").unwrap().unwrap();

        let slow = thread::spawn({
            let files = Arc::clone(&files);
            move || files.serve("/slow").unwrap().unwrap()
        });
        started_rx.recv().unwrap();

        // Mientras /slow sigue leyendo, /fast se responde desde la caché
        let (done_tx, done_rx) = mpsc::channel();
        let fast = thread::spawn({
            let files = Arc::clone(&files);
            move || done_tx.send(files.serve("/fast").unwrap().unwrap()).unwrap()
        });
        let hit = done_rx.recv_timeout(Duration::from_secs(5));

        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap().body(), b"slow");
        fast.join().unwrap();

        assert_eq!(hit.expect("cache hit blocked by another read").body(), b"fast");
        assert_eq!(files.cached(), 2);
    }

    #[test]
    fn test_fs_store() {
        let dir = std::env::temp_dir().join(format!("http_router_fs_store_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.txt"), b"hello").unwrap();

        let store = FsStore::new(&dir);
        assert_eq!(store.read("hello.txt").unwrap(), b"hello");
        assert_eq!(store.read("nope.txt").unwrap_err().kind(), io::ErrorKind::NotFound);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_guess_mimetype() {
        assert_eq!(guess_mimetype("a.CSS"), "text/css");
        assert_eq!(guess_mimetype("main.rs"), "text/plain");
        assert_eq!(guess_mimetype("logo.png"), "image/png");
    }
}
