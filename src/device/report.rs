use crate::store::LogEntry;

/// Something the device tells the remote side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Publication {
    /// A card event, also written to the audit log.
    Card(LogEntry),
    /// Door opened by a remote `open` call.
    Call,
    /// Door opened by the exit button.
    Button,
    Error(String),
}

impl Publication {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::Call => "call",
            Self::Button => "button",
            Self::Error(_) => "error",
        }
    }

    pub fn payload(&self) -> Option<String> {
        match self {
            Self::Card(entry) => Some(entry.to_string()),
            Self::Error(msg) => Some(msg.clone()),
            Self::Call | Self::Button => None,
        }
    }
}

/// Reporting channel collaborator.
pub trait Reporter {
    fn publish(&mut self, publication: &Publication);
}

/// Prints publications on stdout, one per line.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn publish(&mut self, publication: &Publication) {
        match publication.payload() {
            Some(payload) => println!("[{}] {payload}", publication.topic()),
            None => println!("[{}]", publication.topic()),
        }
    }
}
