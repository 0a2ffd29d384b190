mod cli;

use std::io;

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells::Bash};
use json::JsonValue;
use log::error;

use vp_control::command::CONTROL_TYPES;
use vp_control::port;
use vp_control::{
    Action, CommandDescriptor, CommandTable, DispatchConfig, Dispatcher, Outcome, SkipReason,
};

use cli::{Cli, Commands};

#[derive(Clone, Copy)]
enum OutputFormat {
    Plain,
    Json,
}

fn slice_to_column<T>(data: &[T]) -> String
where
    T: ToString,
{
    data.iter()
        .map(|x| x.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

fn opcode_json(opcode: Option<u8>) -> JsonValue {
    opcode.map_or(JsonValue::Null, JsonValue::from)
}

fn cmd_families(fmt: OutputFormat) -> Result<String> {
    Ok(match fmt {
        OutputFormat::Plain => slice_to_column(
            &CONTROL_TYPES
                .iter()
                .map(|ct| {
                    let show = |op: Option<u8>| op.map_or("-".to_string(), |op| op.to_string());
                    format!(
                        "{:6} get {:2} set {:2}",
                        ct,
                        show(ct.get_opcode()),
                        show(ct.set_opcode())
                    )
                })
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Json => json::stringify(
            CONTROL_TYPES
                .iter()
                .map(|ct| {
                    let mut entry = JsonValue::new_object();
                    entry["name"] = ct.name().into();
                    entry["get"] = opcode_json(ct.get_opcode());
                    entry["set"] = opcode_json(ct.set_opcode());
                    entry
                })
                .collect::<Vec<_>>(),
        ),
    })
}

fn command_json(cmd: &CommandDescriptor) -> JsonValue {
    let mut entry = JsonValue::new_object();
    entry["group"] = cmd.group.clone().into();
    entry["description"] = cmd.description.as_str().into();
    entry["control_type"] = cmd.control_type.name().into();
    entry["function_code"] = cmd.function_code.into();
    entry
}

fn cmd_list(commands: &[CommandDescriptor], fmt: OutputFormat) -> Result<String> {
    Ok(match fmt {
        OutputFormat::Plain => slice_to_column(commands),
        OutputFormat::Json => json::stringify(
            commands
                .iter()
                .map(|cmd| {
                    let mut entry = command_json(cmd);
                    entry["set_parameters"] = cmd.parameter_spec.to_string().into();
                    entry["response_values"] = match &cmd.response_values {
                        Some(values) => {
                            let mut obj = JsonValue::new_object();
                            for (k, v) in values {
                                obj[k.as_str()] = v.as_str().into();
                            }
                            obj
                        }
                        None => JsonValue::Null,
                    };
                    entry
                })
                .collect::<Vec<_>>(),
        ),
    })
}

fn outcome_plain(action: &Action, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(v) => match (&v.label, action) {
            (Some(label), _) => format!("{}\t{}", v.raw, label),
            (None, Action::Set(_)) if v.raw.is_empty() => "Done".to_string(),
            (None, _) => format!("{:?}", v.raw),
        },
        Outcome::Skipped(SkipReason::Unsupported(kind)) => format!("has no '{}', skipping", kind),
        Outcome::Skipped(reason) => format!("rejected: {}", reason),
        Outcome::ParseError(frame) => format!("Couldn't parse: {}", frame),
        Outcome::TransportError(e) => format!("transport error: {}", e),
        Outcome::Cancelled => "cancelled".to_string(),
    }
}

fn outcome_json(cmd: &CommandDescriptor, outcome: &Outcome) -> JsonValue {
    let mut entry = command_json(cmd);
    match outcome {
        Outcome::Success(v) => {
            entry["status"] = "ok".into();
            entry["value"] = v.raw.as_str().into();
            entry["label"] = v.label.clone().into();
        }
        Outcome::Skipped(reason) => {
            entry["status"] = "skipped".into();
            entry["reason"] = reason.to_string().into();
        }
        Outcome::ParseError(frame) => {
            entry["status"] = "parse_error".into();
            entry["raw"] = frame.to_text().into();
        }
        Outcome::TransportError(e) => {
            entry["status"] = "transport_error".into();
            entry["reason"] = e.as_str().into();
        }
        Outcome::Cancelled => entry["status"] = "cancelled".into(),
    }
    entry
}

fn prefix(cmd: &CommandDescriptor) -> String {
    match &cmd.group {
        Some(group) => format!("{}:\t{}:\t", group, cmd.description),
        None => format!("{}:\t", cmd.description),
    }
}

fn cmd_dispatch(
    cli: &Cli,
    commands: &[CommandDescriptor],
    action: Action,
    fmt: OutputFormat,
) -> Result<String> {
    if commands.is_empty() {
        return Err(anyhow!("No matching commands"));
    }

    let mut port = port::open_port(&cli.port, cli.baudrate, cli.force, cli.timeout)?;
    let config = DispatchConfig {
        interval: cli.interval,
        frame_timeout: cli.timeout,
        retries: cli.retries,
    };
    let mut dispatcher = Dispatcher::new(port.as_mut(), config);

    match fmt {
        OutputFormat::Plain => {
            dispatcher.run_with(commands, &action, |cmd, outcome| {
                println!("{}{}", prefix(cmd), outcome_plain(&action, outcome))
            });
            Ok(String::new())
        }
        OutputFormat::Json => {
            let outcomes = dispatcher.run(commands, &action);
            Ok(json::stringify(
                commands
                    .iter()
                    .zip(outcomes.iter())
                    .map(|(cmd, outcome)| outcome_json(cmd, outcome))
                    .collect::<Vec<_>>(),
            ))
        }
    }
}

fn load_table(cli: &Cli) -> Result<CommandTable> {
    match &cli.table {
        Some(path) => CommandTable::load(path),
        None => Ok(CommandTable::builtin()),
    }
}

fn filtered(table: &CommandTable, filter: &Option<String>) -> Vec<CommandDescriptor> {
    match filter {
        Some(filter) => table.filter(filter),
        None => table.to_vec(),
    }
}

fn do_main() -> Result<String> {
    if std::env::var("GENERATE_COMPLETION").is_ok() {
        generate(Bash, &mut Cli::command(), "vp-control", &mut io::stdout());

        return Ok(String::default());
    }

    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.debug {
        "debug"
    } else {
        "info"
    }))
    .format_timestamp(None)
    .format_target(false)
    .init();

    let fmt = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Plain
    };

    match &cli.command {
        Commands::Families => cmd_families(fmt),
        Commands::List { filter } => cmd_list(&filtered(&load_table(&cli)?, filter), fmt),
        Commands::Get { filter } => {
            let commands = filtered(&load_table(&cli)?, filter);
            cmd_dispatch(&cli, &commands, Action::Get, fmt)
        }
        Commands::Set { command, value } => {
            let table = load_table(&cli)?;
            let cmd = table
                .find(command.control_type, command.function_code)
                .ok_or_else(|| {
                    anyhow!(
                        "No command {}/{} in table",
                        command.control_type,
                        command.function_code
                    )
                })?;
            cmd_dispatch(&cli, &[cmd.clone()], Action::Set(value.clone()), fmt)
        }
    }
}

fn main() {
    match do_main() {
        Ok(s) if s.is_empty() => (),
        Ok(s) => println!("{}", s),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
