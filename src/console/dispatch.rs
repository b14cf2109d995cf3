use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::Command;
use crate::control::status_code;
use crate::device::Device;
use crate::flash::Flash;
use crate::otp::SimToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tokens the simulated user owns, keyed by UID, plus copies taken of them.
#[derive(Default)]
struct Wallet {
    tokens: HashMap<Vec<u8>, SimToken>,
    clones: HashMap<Vec<u8>, SimToken>,
}

impl Wallet {
    fn token(&mut self, uid: &[u8]) -> &mut SimToken {
        self.tokens
            .entry(uid.to_vec())
            .or_insert_with(|| SimToken::new(uid))
    }

    /// The clone of `uid`, taken now if none exists yet.
    fn clone_of(&mut self, uid: &[u8]) -> &mut SimToken {
        let original = self.token(uid).duplicate();
        match self.clones.entry(uid.to_vec()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(original),
        }
    }
}

pub async fn run_device_loop<F: Flash>(
    mut incoming_rx: mpsc::Receiver<Command>,
    outgoing_tx: mpsc::Sender<String>,
    mut device: Device<F>,
) {
    let mut wallet = Wallet::default();
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    tracing::info!("Device loop running");

    loop {
        tokio::select! {
            _ = interval.tick() => device.poll(Instant::now()),
            command = incoming_rx.recv() => {
                let Some(command) = command else { break };
                if command == Command::Quit {
                    break;
                }
                let reply = handle_command(&mut device, &mut wallet, command, Instant::now());
                if outgoing_tx.send(reply).await.is_err() {
                    tracing::error!("Outgoing channel closed");
                    return;
                }
            }
        }
    }
    tracing::info!("Device loop exiting");
}

fn handle_command<F: Flash>(
    device: &mut Device<F>,
    wallet: &mut Wallet,
    command: Command,
    now: Instant,
) -> String {
    match command {
        Command::Card(uid) => present(device, wallet.token(&uid), now),
        Command::Clone(uid) => present(device, wallet.clone_of(&uid), now),
        Command::Button => {
            device.button(now);
            "1".into()
        }
        Command::Update(text) => {
            let result = device.update(&text);
            if let Err(e) = &result {
                tracing::warn!(request = %text, "Update rejected: {e}");
            }
            status_code(&result).to_string()
        }
        Command::Open => {
            device.open(now);
            "1".into()
        }
        Command::Debug(flag) => (device.set_debug(&flag) as i32).to_string(),
        Command::Reset => {
            let result = device.reset();
            if let Err(e) = &result {
                tracing::error!("Reset failed: {e}");
            }
            status_code(&result).to_string()
        }
        Command::Log => match device.status() {
            Ok(text) => text.trim_end().to_string(),
            Err(e) => format!("error: {e}"),
        },
        Command::Quit => String::new(),
    }
}

fn present<F: Flash>(device: &mut Device<F>, token: &mut SimToken, now: Instant) -> String {
    if !device.scan_ready(now) {
        return "reader busy".into();
    }
    match device.present(token, now) {
        Ok(Some(event)) => format!("{event} {event:?}"),
        Ok(None) => "token not read".into(),
        Err(e) => {
            tracing::error!("Card handling failed: {e}");
            format!("error: {e}")
        }
    }
}
