use anyhow::Context;
use disruption_core::config::Config;
use std::path::Path;

pub fn run(workdir: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load(workdir).context("failed to load config")?;
    let port = port.unwrap_or(config.server.port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(disruption_server::serve(workdir.to_path_buf(), port, config))
}
