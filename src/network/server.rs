//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, SendTimeoutError, Sender};
use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{BinIdxError, Result};

use super::Connection;

/// How long the acceptor waits before rechecking for shutdown
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for BinIdx
///
/// The engine itself has no locking, so it is shared as
/// `Arc<Mutex<Engine>>` and each command holds the lock until it completes.
pub struct Server {
    config: Config,
    engine: Arc<Mutex<Engine>>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Mutex<Engine>>) -> Result<Self> {
        if config.worker_threads == 0 {
            return Err(BinIdxError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            BinIdxError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            self.config.worker_threads
        );

        let (sender, receiver) = channel::bounded::<TcpStream>(self.config.worker_threads * 4);
        let workers: Vec<JoinHandle<()>> = (0..self.config.worker_threads)
            .map(|id| self.spawn_worker(id, receiver.clone()))
            .collect::<Result<_>>()?;
        drop(receiver);

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("Accepted connection from {}", addr);
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    if !self.dispatch(&sender, stream) {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        // Closing the channel lets workers drain and exit.
        drop(sender);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Hand `stream` to the worker pool
    ///
    /// Waits while the queue is full but keeps checking for shutdown, in
    /// which case the connection is dropped. Returns false once no worker
    /// is left to receive.
    fn dispatch(&self, sender: &Sender<TcpStream>, mut stream: TcpStream) -> bool {
        loop {
            match sender.send_timeout(stream, ACCEPT_POLL_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if self.shutdown.is_shutdown() {
                        tracing::debug!("Shutting down, dropping queued connection");
                        return true;
                    }
                    stream = pending;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    tracing::error!("All workers exited, stopping acceptor");
                    return false;
                }
            }
        }
    }

    fn spawn_worker(&self, id: usize, receiver: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let engine = Arc::clone(&self.engine);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        thread::Builder::new()
            .name(format!("binidx-worker-{}", id))
            .spawn(move || {
                for stream in receiver.iter() {
                    let mut connection = match Connection::new(stream, Arc::clone(&engine)) {
                        Ok(c) => c,
                        Err(e) => {
                            tracing::warn!("Failed to set up connection: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
                        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
                    }
                    if let Err(e) = connection.handle() {
                        tracing::warn!("Connection {} ended with error: {}", connection.peer_addr(), e);
                    }
                }
            })
            .map_err(|e| BinIdxError::Network(format!("Failed to spawn worker {}: {}", id, e)))
    }
}
