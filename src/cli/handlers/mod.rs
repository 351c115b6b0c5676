use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, recovery};
use crate::model::config::Config;
use crate::model::record::Record;
use crate::model::store::RecordStore;
use crate::ops::{check, export, record_ops, search};
use crate::parse::serialize_records;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Default number of recovery entries shown
const RECOVERY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let (_, path) = load_context(cli.file.as_deref(), cli.config.as_deref())?;

    match cli.command {
        None => Err("no command given (try `tl --help`)".into()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&path, args, json),
            Commands::Search(args) => cmd_search(&path, args, json),
            Commands::Show(args) => cmd_show(&path, args, json),
            Commands::Copy(args) => cmd_copy(&path, args),
            Commands::Check => cmd_check(&path, json),

            // Write commands
            Commands::Add(args) => cmd_add(&path, args, json),
            Commands::Update(args) => cmd_update(&path, args, json),
            Commands::Delete(args) => cmd_delete(&path, args, json),
            Commands::Fmt => cmd_fmt(&path, json),

            // Maintenance
            Commands::Recovery(args) => cmd_recovery(&path, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the effective config and resolve the data file against the
/// working directory.
pub fn load_context(
    file: Option<&Path>,
    config: Option<&Path>,
) -> Result<(Config, PathBuf), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(config, &cwd)?;
    let path = config_io::resolve_data_file(file, &config, &cwd);
    Ok((config, path))
}

fn open_store(path: &Path) -> Result<RecordStore, Box<dyn std::error::Error>> {
    // Dropped rows are already reported through tracing and the recovery log
    let (store, _warnings) = RecordStore::open(path)?;
    Ok(store)
}

fn find_index(store: &RecordStore, key: &str) -> Result<usize, Box<dyn std::error::Error>> {
    store
        .position(key)
        .ok_or_else(|| format!("record not found: {}", key).into())
}

fn print_write_result(action: &'static str, index: usize, record: &Record, json: bool) -> CmdResult {
    if json {
        let out = WriteResultJson {
            action,
            record: record_to_json(index, record),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} {}", action, record.key);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(path: &Path, args: ListArgs, json: bool) -> CmdResult {
    let store = open_store(path)?;
    let term = args.search.unwrap_or_default();
    let indices = search::filter_indices(&store.records, &term);

    if json {
        let out = RecordListJson {
            file: store.file_name(),
            total: store.len(),
            records: indices
                .iter()
                .map(|&i| record_to_json(i, &store.records[i]))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for &i in &indices {
            println!("{}", format_record_line(&store.records[i]));
        }
    }
    Ok(())
}

fn cmd_search(path: &Path, args: SearchArgs, json: bool) -> CmdResult {
    let store = open_store(path)?;

    if json {
        let hits: Vec<SearchHitJson> = search::search_records(&store.records, &args.term)
            .iter()
            .map(|h| hit_to_json(h, &store.records))
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    for i in search::filter_indices(&store.records, &args.term) {
        println!("{}", format_record_line(&store.records[i]));
    }
    Ok(())
}

fn cmd_show(path: &Path, args: KeyArgs, json: bool) -> CmdResult {
    let store = open_store(path)?;
    let index = find_index(&store, &args.key)?;
    let record = &store.records[index];

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record_to_json(index, record))?
        );
    } else {
        for line in format_record_detail(record) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_copy(path: &Path, args: KeyArgs) -> CmdResult {
    let store = open_store(path)?;
    let index = find_index(&store, &args.key)?;
    println!("{}", export::clipboard_text(&store.records[index]));
    Ok(())
}

fn cmd_check(path: &Path, json: bool) -> CmdResult {
    let result = check::check_file(path)?;

    if json {
        let out = CheckJson {
            file: path.display().to_string(),
            valid: result.is_valid(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_check(&result) {
            println!("{}", line);
        }
    }

    if result.is_valid() {
        Ok(())
    } else {
        Err(format!("{} has problems", path.display()).into())
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(path: &Path, args: AddArgs, json: bool) -> CmdResult {
    let mut store = open_store(path)?;
    let record = Record::new(args.key, args.value, args.tags);

    let next = record_ops::create(&store.records, record.clone())?;
    store.commit(next)?;
    tracing::info!(key = %record.key, "record added");

    print_write_result("added", store.len() - 1, &record, json)
}

fn cmd_update(path: &Path, args: UpdateArgs, json: bool) -> CmdResult {
    let mut store = open_store(path)?;
    let index = find_index(&store, &args.key)?;

    let current = &store.records[index];
    let record = Record::new(
        args.new_key.unwrap_or_else(|| current.key.clone()),
        args.value.unwrap_or_else(|| current.value.clone()),
        args.tags.unwrap_or_else(|| current.tags.clone()),
    );

    let next = record_ops::update(&store.records, index, record.clone())?;
    store.commit(next)?;
    tracing::info!(key = %record.key, "record updated");

    print_write_result("updated", index, &record, json)
}

fn cmd_delete(path: &Path, args: KeyArgs, json: bool) -> CmdResult {
    let mut store = open_store(path)?;
    let index = find_index(&store, &args.key)?;
    let removed = store.records[index].clone();

    let next = record_ops::delete(&store.records, index)?;
    store.commit(next)?;
    recovery::log_record_deletion(path, &removed);
    tracing::info!(key = %removed.key, "record deleted");

    print_write_result("deleted", index, &removed, json)
}

fn cmd_fmt(path: &Path, json: bool) -> CmdResult {
    let before = fs::read_to_string(path).ok();
    let store = open_store(path)?;
    let canonical = serialize_records(&store.records)?;
    let changed = before.as_deref() != Some(canonical.as_str());

    if changed {
        store.save()?;
    }

    if json {
        let out = FmtResultJson {
            file: store.file_name(),
            records: store.len(),
            changed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if changed {
        println!("formatted {} ({} records)", store.file_name(), store.len());
    } else {
        println!("{} already formatted", store.file_name());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(path: &Path, args: RecoveryCmd, json: bool) -> CmdResult {
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(path).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let removed = recovery::prune_recovery(path, prune.all)?;
            if json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!("removed {} entries", removed);
            }
            Ok(())
        }
        None => {
            let limit = args.limit.unwrap_or(RECOVERY_LIMIT);
            let entries = recovery::read_recovery_entries(path, Some(limit));
            if json {
                let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_display_markdown());
                }
            }
            Ok(())
        }
    }
}
