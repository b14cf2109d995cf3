use std::str::FromStr;

use crate::store::fingerprint::parse_uid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Hold the token with this UID to the reader.
    Card(Vec<u8>),
    /// Hold a copy of the token with this UID, taken the first time one is
    /// asked for.
    Clone(Vec<u8>),
    Button,
    Update(String),
    Open,
    Debug(String),
    Reset,
    Log,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        let uid = |arg: &str| parse_uid(arg).map_err(|e| e.to_string());
        match verb {
            "card" => Ok(Self::Card(uid(arg)?)),
            "clone" => Ok(Self::Clone(uid(arg)?)),
            "button" => Ok(Self::Button),
            "update" if !arg.is_empty() => Ok(Self::Update(arg.to_string())),
            "open" => Ok(Self::Open),
            "debug" => Ok(Self::Debug(arg.to_string())),
            "reset" => Ok(Self::Reset),
            "log" => Ok(Self::Log),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(format!("unknown command {line:?}")),
        }
    }
}
