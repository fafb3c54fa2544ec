use anyhow::{Context, Result};
use shared::config::ClientConfig;

use crate::context::AppContext;

pub async fn show_version(config: ClientConfig) -> Result<()> {
    let ctx = AppContext::open(config, "/")?;
    let info = ctx
        .client
        .version_info()
        .await
        .context("failed to fetch version info")?;

    println!("version: {}", info.version);
    for (label, value) in [
        ("branch", &info.git_branch),
        ("commit", &info.git_commit),
        ("built", &info.build_time),
        ("go", &info.go_version),
        ("compiler", &info.compiler),
        ("platform", &info.platform),
    ] {
        if !value.is_empty() {
            println!("{label}: {value}");
        }
    }
    for plugin in info.plugins.iter().flatten() {
        println!("plugin {}: {}", plugin.name, plugin.version);
    }
    Ok(())
}
