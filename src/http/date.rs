//! # Fechas HTTP
//! src/http/date.rs
//!
//! Formatea el header `Date` en formato RFC 1123:
//!
//! ```text
//! Sun, 06 Nov 1994 08:49:37 GMT
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// Fecha actual en formato RFC 1123
pub fn now() -> String {
    format_http_date(SystemTime::now())
}

/// Formatea un instante como fecha HTTP
///
/// Instantes anteriores a 1970 se tratan como el epoch.
///
/// # Ejemplo
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use http_router::http::date::format_http_date;
///
/// let t = UNIX_EPOCH + Duration::from_secs(784111777);
/// assert_eq!(format_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time.max(UNIX_EPOCH))
}
