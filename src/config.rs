pub const KEY_SIZE: usize = 10;
pub const OTP_SIZE: usize = 16;

/// Token data block holding the rotating OTP.
pub const OTP_BLOCK: u8 = 1;
/// MIFARE factory default key A.
pub const FACTORY_KEY: [u8; 6] = [0xFF; 6];

pub const CONFIG_BEGIN: usize = 0;
pub const KEYS_BEGIN: usize = 128;
pub const LOG_BEGIN: usize = 4096 * 8;
pub const USERS_BEGIN: usize = 4096 * 40;
pub const DEFAULT_FLASH_SIZE: usize = 4096 * 96;

/// Size of the status text exposed to the reporting channel.
pub const STATUS_BUFFER_BYTES: usize = 621;

// Schedule alignment applied to the device clock before indexing a user's
// week. Both values are part of the stored schedule format.
pub const SCHEDULE_HOUR_OFFSET: u32 = 2;
pub const SCHEDULE_WEEKDAY_OFFSET: u32 = 5;

#[derive(clap::Parser, Debug, Clone)]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Flash image backing the key, log and user regions.
    #[arg(long)]
    pub flash: Option<std::path::PathBuf>,
    #[arg(long, default_value_t = DEFAULT_FLASH_SIZE)]
    pub flash_size: usize,
    /// How long the relay stays energised after a granted access.
    #[arg(long, default_value_t = 2000)]
    pub open_millis: u64,
    #[arg(long, default_value_t = 250)]
    pub scan_interval_millis: u64,
    /// Forget all keys and log entries, then exit.
    #[arg(long)]
    pub wipe: bool,
}

impl Config {
    /// Flash image path, defaulting to the XDG data dir.
    pub fn flash_path(&self) -> anyhow::Result<std::path::PathBuf> {
        if let Some(path) = &self.flash {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "bouncer")
            .ok_or_else(|| anyhow::anyhow!("cannot determine XDG data dir"))?;
        Ok(dirs.data_dir().join("flash.img"))
    }
}
