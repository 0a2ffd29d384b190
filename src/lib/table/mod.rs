mod builtin;

use std::collections::HashSet;
use std::{fs, ops::Deref, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use json::JsonValue;
use thiserror::Error;

use crate::command::{CommandDescriptor, ControlType, ParamSpec, ResponseValues};

pub use builtin::builtin_commands;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("command table must be a json array")]
    NotAnArray,
    #[error("entry {index}: bad or missing '{field}'")]
    BadField { index: usize, field: &'static str },
    #[error("entry {index}: no control type with get {get:?} and set {set:?}")]
    UnknownControlType {
        index: usize,
        get: Option<u8>,
        set: Option<u8>,
    },
    #[error("entry {index}: unknown set parameter kind '{kind}'")]
    UnknownParameterKind { index: usize, kind: String },
    #[error("entry {index}: empty range {min}..{max}")]
    EmptyRange { index: usize, min: i64, max: i64 },
    #[error("entry {index}: duplicate function code {function_code} for {control_type}")]
    Duplicate {
        index: usize,
        control_type: ControlType,
        function_code: u16,
    },
}

/// Ordered, immutable set of command descriptors.
#[derive(Debug, Clone)]
pub struct CommandTable(Vec<CommandDescriptor>);

impl Deref for CommandTable {
    type Target = [CommandDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CommandTable {
    pub fn new(commands: Vec<CommandDescriptor>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();

        for (index, cmd) in commands.iter().enumerate() {
            if let ParamSpec::IntegerRange(min, max) = cmd.parameter_spec {
                if min > max {
                    return Err(TableError::EmptyRange { index, min, max });
                }
            }
            if !seen.insert((cmd.control_type, cmd.function_code)) {
                return Err(TableError::Duplicate {
                    index,
                    control_type: cmd.control_type,
                    function_code: cmd.function_code,
                });
            }
        }

        Ok(CommandTable(commands))
    }

    /// Table for devices speaking the protocol of firmware newer than KB2.33.
    pub fn builtin() -> Self {
        CommandTable(builtin_commands())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let doc = json::parse(text).context("command table is not valid json")?;
        Ok(parse_table(&doc)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read command table {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn find(&self, control_type: ControlType, function_code: u16) -> Option<&CommandDescriptor> {
        self.0
            .iter()
            .find(|cmd| cmd.control_type == control_type && cmd.function_code == function_code)
    }

    /// Commands whose family name equals `filter` or whose group or
    /// description contains it, ignoring case.
    pub fn filter(&self, filter: &str) -> Vec<CommandDescriptor> {
        let by_family = filter.parse::<ControlType>().ok();
        let needle = filter.to_lowercase();

        self.0
            .iter()
            .filter(|cmd| match by_family {
                Some(ct) => cmd.control_type == ct,
                None => {
                    cmd.description.to_lowercase().contains(&needle)
                        || cmd
                            .group
                            .as_ref()
                            .map_or(false, |g| g.to_lowercase().contains(&needle))
                }
            })
            .cloned()
            .collect()
    }

    pub fn control_types(&self) -> Vec<ControlType> {
        self.0
            .iter()
            .map(|cmd| cmd.control_type)
            .unique()
            .sorted()
            .collect()
    }
}

fn parse_table(doc: &JsonValue) -> Result<CommandTable, TableError> {
    if !doc.is_array() {
        return Err(TableError::NotAnArray);
    }

    let commands = doc
        .members()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    CommandTable::new(commands)
}

fn opt_string(
    index: usize,
    entry: &JsonValue,
    field: &'static str,
) -> Result<Option<String>, TableError> {
    let value = &entry[field];
    if value.is_null() {
        Ok(None)
    } else {
        value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or(TableError::BadField { index, field })
    }
}

fn opt_opcode(index: usize, value: &JsonValue) -> Result<Option<u8>, TableError> {
    if value.is_null() {
        Ok(None)
    } else {
        value.as_u8().map(Some).ok_or(TableError::BadField {
            index,
            field: "control_type",
        })
    }
}

fn parse_entry(index: usize, entry: &JsonValue) -> Result<CommandDescriptor, TableError> {
    if !entry.is_object() {
        return Err(TableError::BadField {
            index,
            field: "entry",
        });
    }

    let description = opt_string(index, entry, "description")?.ok_or(TableError::BadField {
        index,
        field: "description",
    })?;

    let function_code = entry["function_code"].as_u16().ok_or(TableError::BadField {
        index,
        field: "function_code",
    })?;

    let ct = &entry["control_type"];
    if !ct.is_object() {
        return Err(TableError::BadField {
            index,
            field: "control_type",
        });
    }
    let get = opt_opcode(index, &ct["get"])?;
    let set = opt_opcode(index, &ct["set"])?;
    let control_type = ControlType::from_opcodes(get, set)
        .ok_or(TableError::UnknownControlType { index, get, set })?;

    Ok(CommandDescriptor {
        group: opt_string(index, entry, "group")?,
        description,
        comments: opt_string(index, entry, "comments")?,
        function_code,
        control_type,
        parameter_spec: parse_set_parameters(index, &entry["set_parameters"])?,
        response_values: parse_response_values(index, &entry["response_values"])?,
    })
}

fn parse_set_parameters(index: usize, value: &JsonValue) -> Result<ParamSpec, TableError> {
    let bad = TableError::BadField {
        index,
        field: "set_parameters",
    };

    if value.is_null() {
        return Ok(ParamSpec::None);
    }
    if let Some(kind) = value.as_str() {
        return match kind {
            "any" => Ok(ParamSpec::Any),
            "none" => Ok(ParamSpec::None),
            _ => Err(TableError::UnknownParameterKind {
                index,
                kind: kind.to_string(),
            }),
        };
    }
    if !value.is_array() {
        return Err(bad);
    }

    let kind = value[0].as_str().ok_or_else(|| bad.clone())?;
    match kind {
        "any" => Ok(ParamSpec::Any),
        "none" => Ok(ParamSpec::None),
        "integer" => {
            let min = value[1].as_i64().ok_or_else(|| bad.clone())?;
            let max = value[2].as_i64().ok_or(bad)?;
            Ok(ParamSpec::IntegerRange(min, max))
        }
        "gt" => Ok(ParamSpec::GreaterThan(value[1].as_i64().ok_or(bad)?)),
        _ => Err(TableError::UnknownParameterKind {
            index,
            kind: kind.to_string(),
        }),
    }
}

fn parse_response_values(
    index: usize,
    value: &JsonValue,
) -> Result<Option<ResponseValues>, TableError> {
    if value.is_null() {
        return Ok(None);
    }
    if !value.is_object() {
        return Err(TableError::BadField {
            index,
            field: "response_values",
        });
    }

    value
        .entries()
        .map(|(key, label)| {
            label
                .as_str()
                .map(|label| (key.to_string(), label.to_string()))
                .ok_or(TableError::BadField {
                    index,
                    field: "response_values",
                })
        })
        .collect::<Result<ResponseValues, _>>()
        .map(Some)
}
