use anyhow::Result;
use glide_config::GlideConfig;
use glide_gesture::effective_density;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod scenarios;
use scenarios::ScenarioKind;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = GlideConfig::load();

    // Scenario selection: --scenario=<name> or a bare name, then config
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let name = args
        .iter()
        .find_map(|a| a.strip_prefix("--scenario=").map(str::to_string))
        .or_else(|| args.iter().find(|a| !a.starts_with("--")).cloned())
        .or_else(|| config.demo.scenario.clone())
        .unwrap_or_else(|| "flyout".to_string());
    let kind: ScenarioKind = name.parse()?;
    let density = effective_density(config.demo.density.unwrap_or(1.0));

    info!(scenario = %name, density, "replaying");
    let trace = scenarios::run(kind, &config, density)?;

    for entry in &trace.entries {
        if json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            println!("{:>8.1}ms  {:<9} {:?}", entry.time_ms, entry.surface, entry.event);
        }
    }
    info!(scenario = %trace.scenario, events = trace.entries.len(), notes = trace.notes.len(), "replay done");
    Ok(())
}
