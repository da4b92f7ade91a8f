use crate::config::Config;
use anyhow::Result;

pub fn run(config: Config, save: bool) -> Result<()> {
    print!("{}", config.to_toml()?);
    if save {
        let path = config.save()?;
        log::info!("Saved configuration to {}", path.display());
    }
    Ok(())
}
