use std::path::Path;

use anyhow::{Result, bail};
use comfy_table::{ContentArrangement, Table};
use tagpick_app::{App, SaveOutcome};
use tagpick_core::config::TagpickConfig;
use tagpick_core::serialize::split_tags;
use tagpick_tui::{WidgetExit, WidgetOptions};

use crate::cli::{Cli, Command};

pub fn run_with_deps(
    cli: Cli,
    app: &App<'_>,
    config: &TagpickConfig,
    store_dir: &Path,
) -> Result<()> {
    let source = cli.source.clone().or_else(|| config.source.clone());

    match cli.command {
        Some(Command::Vocab) => run_vocab_command(app, source.as_deref()),
        Some(Command::Add { ref new_tags }) => run_add_command(app, source.as_deref(), new_tags),
        None => run_picker_command(&cli, config, source, store_dir),
    }
}

fn run_vocab_command(app: &App<'_>, source: Option<&str>) -> Result<()> {
    let vocabulary = app.load_vocabulary(source);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tag"]);
    for tag in &vocabulary {
        table.add_row(vec![tag.as_str()]);
    }

    match source {
        Some(source) => println!("source: {source}"),
        None => println!("source: none (fallback vocabulary)"),
    }
    println!("{table}");
    Ok(())
}

fn run_add_command(app: &App<'_>, source: Option<&str>, new_tags: &[String]) -> Result<()> {
    let Some(source) = source else {
        bail!("no vocabulary source configured; set `source` in the config or pass --source");
    };

    let tags = split_tags(&new_tags.join(","));
    if tags.is_empty() {
        bail!("no tags to add");
    }

    match app.persist_tags(source, tags) {
        SaveOutcome::Saved { created, failed } => {
            for tag in &created {
                println!("added: {tag}");
            }
            if !failed.is_empty() {
                bail!("failed to add {} tag(s): {}", failed.len(), failed.join(", "));
            }
            Ok(())
        }
        // persist_tags only ever reports Saved; the guards live here.
        other => bail!("unexpected save outcome: {other:?}"),
    }
}

fn run_picker_command(
    cli: &Cli,
    config: &TagpickConfig,
    source: Option<String>,
    store_dir: &Path,
) -> Result<()> {
    let options = WidgetOptions {
        source,
        store_dir: store_dir.to_path_buf(),
        seed: cli.tags.clone(),
        theme: config.widget.theme.clone(),
        tag_style: config.widget.tag_style,
        tag_appearance: config.widget.tag_appearance,
        multi_select: config.widget.multi_select,
    };

    let outcome = tagpick_tui::run_widget(&options)?;
    if outcome.exit == WidgetExit::Completed
        && let Some(selection) = outcome.selection
    {
        println!("{selection}");
    }

    Ok(())
}
