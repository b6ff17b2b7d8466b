//! Terminal input thread and the application event channel.
//!
//! Input is read on an OS thread because `crossterm::event::poll()` blocks and would
//! starve the runtime. Backend results arrive on the same channel, so every state
//! change happens on the UI loop.

use crate::dispatch::{BackendResult, Ticket};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    Backend { ticket: Ticket, result: BackendResult },
    /// Transport or decoding failure. Ends the session.
    Fatal(String),
    /// Transient toast, auto-dismissed after `ERROR_TTL_SECS`.
    Error(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let input_tx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = shutdown.clone();

        std::thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(e) => {
                        let _ = input_tx.send(AppEvent::Fatal(format!("Terminal poll error: {e}")));
                        break;
                    }
                };
                let next = if ready {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            AppEvent::Key(key)
                        }
                        Ok(CrosstermEvent::Resize(..)) => AppEvent::Resize,
                        Ok(_) => continue,
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            let _ = input_tx.send(AppEvent::Fatal(format!("Terminal read error: {e}")));
                            break;
                        }
                    }
                } else {
                    AppEvent::Tick
                };
                if input_tx.send(next).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx, shutdown }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        // Signal only. Joining could hang while `poll` blocks; the thread exits on its next tick.
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
