use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cfg = bouncer::config::Config::parse();
    if cfg.wipe {
        return bouncer::wipe(cfg);
    }
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(bouncer::run(cfg))
}
