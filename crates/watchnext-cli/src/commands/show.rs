use crate::commands::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchnext_config::{Config, PathManager};

fn table(title: &str, columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let label = if i == 0 { format!("{} · {}", title, c) } else { c.to_string() };
                Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold)
            })
            .collect::<Vec<_>>(),
    );
    table
}

fn yes_no(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

pub async fn run_show(config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let channels = context.channels();

    let categories = context.database.find_all_categories().await;
    let published = channels
        .get_channels()
        .await
        .map_err(|e| eyre!("Failed to query channels: {}", e))?;
    let mut programs = Vec::with_capacity(published.len());
    for channel in &published {
        let rows = channels
            .get_programs(channel.id)
            .await
            .map_err(|e| eyre!("Failed to query programs of channel {}: {}", channel.id, e))?;
        programs.push(rows);
    }
    let watch_next = context
        .watch_next()
        .get_programs()
        .await
        .map_err(|e| eyre!("Failed to query the watch next row: {}", e))?;

    if !output.is_human() {
        output.json(&json!({
            "type": "state",
            "categories": categories.iter().map(|c| json!({
                "id": c.id,
                "name": c.name,
                "channel_id": c.channel_id,
                "movies": c.movies.iter().map(|m| m.movie_id).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "channels": published.iter().zip(&programs).map(|(channel, rows)| json!({
                "id": channel.id,
                "name": channel.data.display_name,
                "category_id": channel.data.internal_provider_id,
                "browsable": channel.data.browsable,
                "programs": rows.iter().map(|p| json!({
                    "id": p.id,
                    "movie_id": p.data.content.internal_provider_id,
                    "title": p.data.content.title,
                    "weight": p.data.weight,
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "watch_next": watch_next.iter().map(|p| json!({
                "id": p.id,
                "movie_id": p.data.content.internal_provider_id,
                "type": p.data.watch_next_type.to_string(),
                "position_ms": p.data.last_playback_position_millis,
                "browsable": p.data.browsable,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    let mut catalog = table("Catalog", &["Category", "Name", "Channel", "Movies"]);
    for category in &categories {
        catalog.add_row(vec![
            Cell::new(&category.id),
            Cell::new(&category.name),
            Cell::new(category.channel_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(
                category
                    .movies
                    .iter()
                    .map(|m| m.movie_id.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ]);
    }
    println!("{}", catalog);

    let mut channel_table = table("Channels", &["Channel", "Name", "Category", "Browsable", "Programs"]);
    for (channel, rows) in published.iter().zip(&programs) {
        channel_table.add_row(vec![
            Cell::new(channel.id),
            Cell::new(&channel.data.display_name),
            Cell::new(channel.data.internal_provider_id.as_deref().unwrap_or("-")),
            Cell::new(yes_no(channel.data.browsable)),
            Cell::new(
                rows.iter()
                    .map(|p| format!("{} {} (w{})", p.id, p.data.content.title, p.data.weight))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        ]);
    }
    println!("{}", channel_table);

    let mut row_table = table("Watch next", &["Program", "Movie", "Type", "Position (ms)", "Browsable"]);
    for program in &watch_next {
        row_table.add_row(vec![
            Cell::new(program.id),
            Cell::new(&program.data.content.title),
            Cell::new(program.data.watch_next_type),
            Cell::new(
                program
                    .data
                    .last_playback_position_millis
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(yes_no(program.data.browsable)),
        ]);
    }
    println!("{}", row_table);

    Ok(())
}
