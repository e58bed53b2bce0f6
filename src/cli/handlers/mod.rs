use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::drag::DragController;
use crate::drag::script;
use crate::io::{IoError, config_io, snapshot_io};
use crate::model::config::EditorConfig;
use crate::model::expansion::ExpansionSet;
use crate::ops::check;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Show(args) => cmd_show(args, &config, json),
        Commands::Check(args) => cmd_check(args, &config, json),
        Commands::Replay(args) => cmd_replay(args, &config, json),
    }
}

fn load_config(explicit: Option<&str>) -> Result<EditorConfig, IoError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    config_io::load_config(explicit.map(Path::new), &cwd)
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(
    args: ShowArgs,
    config: &EditorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = snapshot_io::read_tree(Path::new(&args.tree))?;
    let mut expansion =
        ExpansionSet::with_defaults(config.expansion.default_expanded.iter().cloned());
    for id in &args.expand {
        expansion.expand(id);
    }

    if json {
        let out = ShowJson {
            tree: &tree,
            expanded: &expansion,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let shown = if args.all { None } else { Some(&expansion) };
        for line in format_outline(&tree, shown) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(
    args: CheckArgs,
    config: &EditorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = snapshot_io::read_tree_unchecked(Path::new(&args.tree))?;
    let result = check::check_tree(&tree, config.drag.max_depth);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::DuplicateId { id, count } => {
                        println!("  {} appears {} times", id, count);
                    }
                    check::CheckError::ChildrenNotAllowed { id, kind, children } => {
                        println!("  {} is a {} but has {} children", id, kind, children);
                    }
                    check::CheckError::EmptyId { title } => {
                        println!("  node \"{}\" has an empty id", title);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::TooDeep {
                        id,
                        depth,
                        max_depth,
                    } => {
                        println!("  {} is at depth {} (max {})", id, depth, max_depth);
                    }
                    check::CheckWarning::MultipleHomes { ids } => {
                        println!("  multiple home pages: {}", ids.join(", "));
                    }
                    check::CheckWarning::NestedHome { id, depth } => {
                        println!("  home page {} is nested at depth {}", id, depth);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ tree is valid");
        } else {
            println!("✗ tree has errors");
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err("tree has errors".into())
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn cmd_replay(
    args: ReplayArgs,
    config: &EditorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = snapshot_io::read_tree(Path::new(&args.tree))?;
    let gestures = snapshot_io::read_gestures(Path::new(&args.gestures))?;

    let mut controller = DragController::new(tree, config);
    let outcomes = script::replay(&mut controller, &gestures)?;
    info!(events = outcomes.len(), "replay finished");
    if controller.is_dragging() {
        return Err("gesture script ended mid-drag (missing end or cancel)".into());
    }

    if let Some(out) = &args.output {
        snapshot_io::write_tree(Path::new(out), controller.tree())?;
    }

    let described: Vec<String> = outcomes.iter().map(format_outcome).collect();
    if json {
        let out = ReplayJson {
            outcomes: described,
            tree: controller.tree(),
            expanded: controller.expansion(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (i, line) in described.iter().enumerate() {
            println!("{:>3}. {}", i + 1, line);
        }
        println!();
        let shown = if args.all {
            None
        } else {
            Some(controller.expansion())
        };
        for line in format_outline(controller.tree(), shown) {
            println!("{}", line);
        }
    }
    Ok(())
}
