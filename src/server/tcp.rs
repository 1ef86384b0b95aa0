//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Acepta una conexión a la vez y la atiende completa antes de aceptar la
//! siguiente:
//!
//! ```text
//! accept → read (una vez) → parse → dispatch → write → close
//! ```
//!
//! No hay keep-alive: cada conexión lleva exactamente un request. Un
//! cliente lento bloquea al resto.

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::http::{date, Request, StatusCode};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::time::Instant;

/// Conexiones pendientes que acepta el kernel mientras se atiende otra
pub const LISTEN_BACKLOG: i32 = 1;

/// Servidor HTTP/1.0 bloqueante
pub struct Server {
    config: Config,
    dispatcher: Dispatcher,
}

impl Server {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// Hace bind en la dirección configurada y atiende conexiones para siempre
    pub fn run(&self) -> io::Result<()> {
        let address = self.config.address();
        let listener = bind(&address)?;
        tracing::info!(%address, app = self.dispatcher.name(), "server listening");

        self.serve(listener)
    }

    /// Atiende conexiones de un listener ya abierto
    ///
    /// Errores de `accept` o de una conexión se registran y el loop sigue.
    pub fn serve(&self, listener: TcpListener) -> io::Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        tracing::warn!(error = %e, "connection failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }

        Ok(())
    }

    /// Atiende una conexión: un request, una respuesta
    pub fn handle_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let start = Instant::now();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let mut buffer = vec![0u8; self.config.buffer_size];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            tracing::debug!(%peer, "connection closed before request");
            return Ok(());
        }

        let (response, method, path) = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => {
                let method = request.method().to_string();
                let path = request.path().to_string();
                (self.dispatcher.dispatch(request), method, path)
            }
            Err(e) => {
                tracing::debug!(%peer, error = %e, "unparseable request");
                let response = self
                    .dispatcher
                    .render_error(StatusCode::BAD_REQUEST, &format!("Invalid request: {}", e));
                (response, "-".to_string(), "-".to_string())
            }
        };

        let bytes = response.to_bytes(&self.config.server_name, &date::now());
        stream.write_all(&bytes)?;
        stream.flush()?;

        let status = response.status().unwrap_or(StatusCode::OK);
        tracing::info!(
            %peer,
            %method,
            %path,
            status = status.as_u16(),
            bytes = bytes.len(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request served"
        );

        Ok(())
    }
}

/// Abre un socket de escucha en `address` con backlog [`LISTEN_BACKLOG`]
pub fn bind(address: &str) -> io::Result<TcpListener> {
    let addr = address
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("no address for {}", address)))?;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket.into())
}
