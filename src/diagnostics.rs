use crate::config::Config;
use crate::store::Layout;

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: region layout fits the device
    if let Err(e) = Layout::for_device(cfg.flash_size).geometry() {
        errors.push(format!(
            "flash size {} cannot hold the region layout: {e}\n  \
             → pass a larger --flash-size",
            cfg.flash_size
        ));
    }

    // Check 2: flash image usable
    match cfg.flash_path() {
        Err(e) => errors.push(format!("{e}\n  → pass --flash <PATH>")),
        Ok(path) => match std::fs::metadata(&path) {
            Ok(meta) if meta.len() != 0 && meta.len() != cfg.flash_size as u64 => {
                errors.push(format!(
                    "{} is {} bytes, expected {}\n  \
                     → pass --flash-size {} or move the image away",
                    path.display(),
                    meta.len(),
                    cfg.flash_size,
                    meta.len()
                ))
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(dir) = path.parent() {
                    if let Err(e) = std::fs::create_dir_all(dir) {
                        errors.push(format!("cannot create {}: {e}", dir.display()));
                    }
                }
            }
            Err(e) => errors.push(format!("cannot access {}: {e}", path.display())),
        },
    }

    // Check 3: door timing
    if cfg.open_millis == 0 {
        errors.push("--open-millis must be positive".into());
    }

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        eprintln!("ERROR: {err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}
