//! Interactive rulegate demo.
//!
//! Reads edits from stdin, prints the disclosed rule feed after every
//! mutation, and surfaces automaton notices as the background tickers
//! fire. Set `RULEGATE_MARKER_SECS` / `RULEGATE_HAZARD_SECS` to speed the
//! simulation up, and `RUST_LOG=debug` to watch the worker.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use rulegate::{
    GateResult, GateRuntime, GateRuntimeConfig, LiveStatus, Notice, Reading, RuleId, Snapshot,
};

fn period_from_env(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn print_snapshot(snapshot: &Snapshot) {
    println!();
    println!("  text: {}", snapshot.rendered);
    for rule in &snapshot.rules {
        let mark = if !rule.active {
            "-"
        } else if rule.valid {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {} ({})", rule.label, rule.id);
    }
    println!(
        "  {}/{} satisfied{}",
        snapshot.satisfied,
        snapshot.total,
        if snapshot.all_satisfied {
            " - all rules satisfied!"
        } else {
            ""
        }
    );
}

fn print_help() {
    println!("commands:");
    println!("  :toggle <rule-id>     enable/disable a rule");
    println!("  :dict <word> <def>    resolve the dictionary word");
    println!("  :dict!                fail the dictionary lookup");
    println!("  :temp <fahrenheit>    resolve the temperature reading");
    println!("  :temp!                fail the temperature lookup");
    println!("  :rules                reprint the rule feed");
    println!("  :json                 print the snapshot as JSON");
    println!("  :quit                 exit");
    println!("anything else becomes the new text.");
}

fn handle_command(runtime: &GateRuntime, line: &str) -> GateResult<Option<Snapshot>> {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next().unwrap_or_default();

    match command {
        ":toggle" => match parts.next().and_then(RuleId::lookup) {
            Some(id) => runtime.toggle(id).map(Some),
            None => {
                println!("unknown rule id");
                Ok(None)
            }
        },
        ":dict" => match (parts.next(), parts.next()) {
            (Some(word), Some(definition)) => runtime
                .resolve_dictionary(LiveStatus::Ready(rulegate::Definition {
                    word: word.to_string(),
                    definition: definition.to_string(),
                }))
                .map(Some),
            _ => {
                println!("usage: :dict <word> <definition>");
                Ok(None)
            }
        },
        ":dict!" => runtime.resolve_dictionary(LiveStatus::Failed).map(Some),
        ":temp" => match parts.next().and_then(|v| v.parse::<f64>().ok()) {
            Some(fahrenheit) => runtime
                .resolve_temperature(LiveStatus::Ready(Reading { fahrenheit }))
                .map(Some),
            None => {
                println!("usage: :temp <fahrenheit>");
                Ok(None)
            }
        },
        ":temp!" => runtime.resolve_temperature(LiveStatus::Failed).map(Some),
        ":rules" => runtime.snapshot().map(Some),
        ":json" => {
            println!("{}", runtime.snapshot()?.to_json()?);
            Ok(None)
        }
        _ => {
            print_help();
            Ok(None)
        }
    }
}

fn main() -> GateResult<()> {
    env_logger::init();

    let config = GateRuntimeConfig {
        marker_period: period_from_env("RULEGATE_MARKER_SECS", Duration::from_secs(12)),
        hazard_period: period_from_env("RULEGATE_HAZARD_SECS", Duration::from_secs(10)),
        ..GateRuntimeConfig::default()
    };
    let runtime = GateRuntime::start(config)?;

    // Background tickers mutate the text between prompts; surface their
    // notices as they happen.
    let registration = runtime.subscribe()?;
    let notices = registration.stream;
    thread::spawn(move || {
        while let Ok(event) = notices.recv() {
            match event.notice {
                Some(Notice::AutomatonReset) => {
                    println!("\n!! the \u{1F95A} walked into a \u{1F525} - the text burned down");
                    print_snapshot(&event.snapshot);
                }
                Some(Notice::MarkerArrived) => {
                    println!("\n** the \u{1F95A} reached the \u{1F3E0}");
                    print_snapshot(&event.snapshot);
                }
                Some(Notice::Completed) => {
                    println!("\n** every rule satisfied");
                    print_snapshot(&event.snapshot);
                }
                None => {}
            }
        }
    });

    println!("rulegate demo - type text, or :help for commands");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if line == ":quit" {
            break;
        }

        let snapshot = if line.starts_with(':') {
            handle_command(&runtime, line)?
        } else {
            Some(runtime.edit(line)?)
        };

        if let Some(snapshot) = snapshot {
            print_snapshot(&snapshot);
        }
    }

    Ok(())
}
