use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use keychain::cli::{CliArgs, RunConfig};
use keychain::config::EngineConfig;
use keychain::fs_watcher::BindingSourceWatcher;
use keychain::keymap::{
    load_default_keymap, load_keymap_file, CommandExecutor, KeyEventDispatcher, KeymapConfig,
    TriggerKind,
};
use keychain::script::{parse_line, ScriptStep};

fn load_keymap(config: &RunConfig) -> Result<KeymapConfig> {
    match &config.keymap {
        Some(path) => load_keymap_file(path)
            .with_context(|| format!("Failed to load keymap from {}", path.display())),
        None => Ok(load_default_keymap()),
    }
}

fn reload<E: CommandExecutor>(
    dispatcher: &mut KeyEventDispatcher<E>,
    config: &RunConfig,
) -> Result<()> {
    let keymap = load_keymap(config)?;
    dispatcher
        .reload(&keymap)
        .context("Failed to reload keymap")?;
    println!("reloaded");
    Ok(())
}

fn open_script(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn main() -> Result<()> {
    keychain::tracing::init();

    let engine = EngineConfig::load();
    let config = CliArgs::parse()
        .into_config(engine.general.cmd_timeout)
        .map_err(anyhow::Error::msg)?;

    let keymap = load_keymap(&config)?;

    let executor = |command: &str, kind: TriggerKind, count: Option<u32>| match count {
        Some(count) => println!("execute {} ({}, count {})", command, kind, count),
        None => println!("execute {} ({})", command, kind),
    };
    let mut dispatcher = KeyEventDispatcher::new(config.dispatch, executor);
    dispatcher.on_keystring_updated(|keystring| println!("keystring \"{}\"", keystring));
    dispatcher
        .read_config(&keymap, Some(&config.section))
        .with_context(|| format!("Failed to bind section \"{}\"", config.section))?;

    let watcher = if config.watch {
        let path = config
            .keymap
            .clone()
            .or_else(keychain::config_paths::keymap_file)
            .context("No keymap file to watch")?;
        Some(BindingSourceWatcher::new(path).context("Failed to watch keymap file")?)
    } else {
        None
    };

    // Script time is virtual: it only moves on @wait
    let mut now = Instant::now();

    for (index, line) in open_script(config.script.as_deref())?.lines().enumerate() {
        let line = line.context("Failed to read script")?;

        if watcher.as_ref().is_some_and(BindingSourceWatcher::poll_changed) {
            reload(&mut dispatcher, &config)?;
        }

        let step = match parse_line(&line) {
            Ok(Some(step)) => step,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", index + 1, e);
                continue;
            }
        };

        match step {
            ScriptStep::Keys(events) => {
                for event in &events {
                    if !dispatcher.handle_at(event, now) {
                        println!("unhandled {:?}", event.text);
                    }
                }
            }
            ScriptStep::Wait(duration) => {
                now += duration;
                dispatcher.tick(now);
            }
            ScriptStep::Reload => reload(&mut dispatcher, &config)?,
        }
    }

    // Let a pending ambiguous match resolve before exiting
    if let Some(deadline) = dispatcher.next_deadline() {
        dispatcher.tick(deadline);
    }

    Ok(())
}
