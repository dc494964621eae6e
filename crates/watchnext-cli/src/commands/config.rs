use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::json;
use watchnext_config::{Config, PathManager, ProviderBackend};

pub async fn run_config(cmd: ConfigCommands, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config, path_manager, output),
        ConfigCommands::Init { force } => init_config(force, path_manager, output),
    }
}

fn backend_name(backend: &ProviderBackend) -> &'static str {
    match backend {
        ProviderBackend::File => "file",
        ProviderBackend::Memory => "memory",
    }
}

fn show_config(config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let store_dir = config.store_dir(path_manager);
    let provider_file = config.provider_file(path_manager);

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "provider": {
                "backend": backend_name(&config.provider.backend),
                "file": provider_file.display().to_string(),
                "app_link_scheme": config.provider.app_link_scheme,
                "app_link_host": config.provider.app_link_host,
                "input_id": config.provider.input_id,
            },
            "store_dir": store_dir.display().to_string(),
            "seed_default_catalog": config.sync.seed_default_catalog,
            "logging": config.logging.as_ref().map(|l| json!({
                "level": l.level,
                "json": l.json,
                "file": l.file.as_ref().map(|f| f.display().to_string()),
            })),
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("No configuration file at {}, showing defaults", config_file.display()));
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("Provider backend"), Cell::new(backend_name(&config.provider.backend))]);
    if config.provider.backend == ProviderBackend::File {
        table.add_row(vec![Cell::new("Provider file"), Cell::new(provider_file.display())]);
    }
    table.add_row(vec![Cell::new("App link scheme"), Cell::new(&config.provider.app_link_scheme)]);
    table.add_row(vec![Cell::new("App link host"), Cell::new(&config.provider.app_link_host)]);
    table.add_row(vec![Cell::new("Input id"), Cell::new(&config.provider.input_id)]);
    table.add_row(vec![Cell::new("Store directory"), Cell::new(store_dir.display())]);
    table.add_row(vec![Cell::new("Seed default catalog"), Cell::new(config.sync.seed_default_catalog)]);
    if let Some(logging) = &config.logging {
        table.add_row(vec![Cell::new("Log level"), Cell::new(&logging.level)]);
        table.add_row(vec![Cell::new("JSON logs"), Cell::new(logging.json)]);
        if let Some(file) = &logging.file {
            table.add_row(vec![Cell::new("Log file"), Cell::new(file.display())]);
        }
    }
    println!("{}", table);
    Ok(())
}

fn init_config(force: bool, path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration file already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
