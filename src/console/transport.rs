use std::io::BufRead;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Command;

pub struct ConsoleTransport {
    pub incoming_rx: mpsc::Receiver<Command>,
    pub outgoing_tx: mpsc::Sender<String>,
    pub task: JoinHandle<std::io::Result<()>>,
}

/// Reads commands from stdin on a blocking task and prints replies from a
/// dedicated writer thread.
pub fn start_console_transport() -> ConsoleTransport {
    let (incoming_tx, incoming_rx) = mpsc::channel::<Command>(64);
    let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<String>(64);
    let errors_tx = outgoing_tx.clone();

    let task = tokio::task::spawn_blocking(move || {
        std::thread::spawn(move || {
            while let Some(reply) = outgoing_rx.blocking_recv() {
                println!("{reply}");
            }
            tracing::debug!("Console writer thread exiting");
        });

        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    if incoming_tx.blocking_send(command).is_err() || quit {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!("Rejected console line: {e}");
                    if errors_tx.blocking_send(format!("? {e}")).is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Console input closed");
        Ok(())
    });

    ConsoleTransport {
        incoming_rx,
        outgoing_tx,
        task,
    }
}
