// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lorasync CLI entrypoint.
//!
//! Thin wrapper over the library for scripting and debugging prompt reconciliation. Output is
//! JSON (or plain text for `apply`) on stdout; logs go to stderr, filtered by `LORASYNC_LOG`.

use std::error::Error;

use lorasync::api::{HttpLmApi, LmApi};
use lorasync::config::SyncConfig;
use lorasync::format::{group_trigger_words, join_active_tags, GroupOptions};
use lorasync::model::{LoraList, ModelKind, TriggerTag};
use lorasync::ops::{apply_list_to_text, merge_text};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} parse <text>\n  {program} apply <text> <entries-json>\n  {program} triggers <message> [--group] [--inactive] [--existing <tags-json>]\n  {program} search <query> [--kind loras|embeddings|checkpoints]\n\nparse prints the LoRA entries found in <text> as JSON.\napply rewrites <text> so its tokens match <entries-json> and prints the result.\ntriggers prints the toggle tags for a trigger-word message and the active prompt output.\nsearch queries the model library at LORASYNC_BASE_URL (default http://127.0.0.1:8188)."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Parse { text: String },
    Apply { text: String, entries_json: String },
    Triggers {
        message: String,
        group_mode: bool,
        default_active: bool,
        existing_json: Option<String>,
    },
    Search { query: String, kind: ModelKind },
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<Command, ()> {
    let command = args.next().ok_or(())?;
    match command.as_str() {
        "parse" => {
            let text = args.next().ok_or(())?;
            if args.next().is_some() {
                return Err(());
            }
            Ok(Command::Parse { text })
        }
        "apply" => {
            let text = args.next().ok_or(())?;
            let entries_json = args.next().ok_or(())?;
            if args.next().is_some() {
                return Err(());
            }
            Ok(Command::Apply { text, entries_json })
        }
        "triggers" => {
            let mut message = None;
            let mut group_mode = false;
            let mut default_active = true;
            let mut existing_json = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--group" => group_mode = true,
                    "--inactive" => default_active = false,
                    "--existing" => {
                        if existing_json.is_some() {
                            return Err(());
                        }
                        existing_json = Some(args.next().ok_or(())?);
                    }
                    _ if arg.starts_with("--") => return Err(()),
                    _ => {
                        if message.is_some() {
                            return Err(());
                        }
                        message = Some(arg);
                    }
                }
            }
            Ok(Command::Triggers {
                message: message.ok_or(())?,
                group_mode,
                default_active,
                existing_json,
            })
        }
        "search" => {
            let mut query = None;
            let mut kind = ModelKind::Loras;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--kind" => {
                        let raw = args.next().ok_or(())?;
                        kind = raw.parse().map_err(|_| ())?;
                    }
                    _ if arg.starts_with("--") => return Err(()),
                    _ => {
                        if query.is_some() {
                            return Err(());
                        }
                        query = Some(arg);
                    }
                }
            }
            Ok(Command::Search { query: query.ok_or(())?, kind })
        }
        _ => Err(()),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LORASYNC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, config: &SyncConfig) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Parse { text } => {
            let entries = merge_text(&text, &LoraList::new());
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Apply { text, entries_json } => {
            let entries: LoraList = serde_json::from_str(&entries_json)?;
            println!("{}", apply_list_to_text(&text, &entries));
        }
        Command::Triggers { message, group_mode, default_active, existing_json } => {
            let existing: Vec<TriggerTag> = match existing_json {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };
            let options =
                GroupOptions { group_mode, default_active, allow_strength_adjustment: true };
            let tags = group_trigger_words(&message, options, &existing);
            let output = serde_json::json!({
                "tags": tags,
                "output": join_active_tags(&tags),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Search { query, kind } => {
            let api = HttpLmApi::from_config(config);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let paths = runtime.block_on(api.search(kind, &query, config.search_limit))?;
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "lorasync".to_owned());

        let command = match parse_options(args) {
            Ok(command) => command,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();
        let config = SyncConfig::from_env()?;
        run(command, &config)
    })();

    if let Err(err) = result {
        eprintln!("lorasync: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, Command};
    use lorasync::model::ModelKind;

    fn args(items: &[&str]) -> impl Iterator<Item = String> {
        items.iter().map(|item| (*item).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_subcommands() {
        assert_eq!(
            parse_options(args(&["parse", "<lora:a:1>"])),
            Ok(Command::Parse { text: "<lora:a:1>".to_owned() })
        );
        assert_eq!(
            parse_options(args(&["triggers", "a,,b", "--group", "--inactive"])),
            Ok(Command::Triggers {
                message: "a,,b".to_owned(),
                group_mode: true,
                default_active: false,
                existing_json: None,
            })
        );
        assert_eq!(
            parse_options(args(&["search", "ink", "--kind", "embeddings"])),
            Ok(Command::Search { query: "ink".to_owned(), kind: ModelKind::Embeddings })
        );
    }

    #[test]
    fn rejects_bad_usage() {
        assert_eq!(parse_options(args(&[])), Err(()));
        assert_eq!(parse_options(args(&["apply", "text"])), Err(()));
        assert_eq!(parse_options(args(&["parse", "a", "b"])), Err(()));
        assert_eq!(parse_options(args(&["triggers"])), Err(()));
        assert_eq!(parse_options(args(&["search", "x", "--kind", "vae"])), Err(()));
        assert_eq!(parse_options(args(&["frobnicate"])), Err(()));
    }
}
