use std::collections::BTreeMap;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Control-type family. Every family shares one pair of optional opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlType {
    Zero,
    SetA,
    SetB,
    Five,
    SetC,
    Eight,
}

pub const CONTROL_TYPES: &[ControlType] = &[
    ControlType::Zero,
    ControlType::SetA,
    ControlType::SetB,
    ControlType::Five,
    ControlType::SetC,
    ControlType::Eight,
];

impl ControlType {
    pub const fn get_opcode(self) -> Option<u8> {
        match self {
            ControlType::Zero => None,
            ControlType::SetA => Some(2),
            ControlType::SetB => Some(4),
            ControlType::Five => None,
            ControlType::SetC => Some(7),
            ControlType::Eight => Some(8),
        }
    }

    pub const fn set_opcode(self) -> Option<u8> {
        match self {
            ControlType::Zero => Some(0),
            ControlType::SetA => Some(1),
            ControlType::SetB => Some(3),
            ControlType::Five => Some(5),
            ControlType::SetC => Some(6),
            ControlType::Eight => None,
        }
    }

    pub fn opcode(self, kind: ActionKind) -> Option<u8> {
        match kind {
            ActionKind::Get => self.get_opcode(),
            ActionKind::Set => self.set_opcode(),
        }
    }

    pub fn from_opcodes(get: Option<u8>, set: Option<u8>) -> Option<ControlType> {
        CONTROL_TYPES
            .iter()
            .copied()
            .find(|ct| ct.get_opcode() == get && ct.set_opcode() == set)
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlType::Zero => "zero",
            ControlType::SetA => "set-a",
            ControlType::SetB => "set-b",
            ControlType::Five => "five",
            ControlType::SetC => "set-c",
            ControlType::Eight => "eight",
        }
    }
}

impl Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

#[derive(Error, Debug)]
pub enum ControlTypeError {
    #[error("invalid control type '{0}'")]
    BadControlType(String),
}

impl FromStr for ControlType {
    type Err = ControlTypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.to_ascii_lowercase().replace('_', "-");
        CONTROL_TYPES
            .iter()
            .copied()
            .find(|ct| ct.name() == normalized)
            .ok_or_else(|| ControlTypeError::BadControlType(input.to_string()))
    }
}

/// Constraint on the value accepted by a set action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec {
    None,
    Any,
    IntegerRange(i64, i64),
    GreaterThan(i64),
}

impl Display for ParamSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ParamSpec::None => "-".to_string(),
            ParamSpec::Any => "any".to_string(),
            ParamSpec::IntegerRange(min, max) => format!("{}..{}", min, max),
            ParamSpec::GreaterThan(min) => format!(">{}", min),
        };
        f.pad(&text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("command takes no value")]
    NoValueAccepted,
    #[error("command needs a value")]
    MissingValue,
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
    #[error("out of range: {value} not in {min}..{max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("not greater than min: {value} <= {min}")]
    NotGreaterThan { value: i64, min: i64 },
}

fn parse_integer(value: &str) -> Result<i64, ValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger(value.to_string()))
}

/// Checks a set value against `spec` and returns the text to put on the wire.
///
/// Commands without a parameter are bare triggers: they accept no value and
/// produce none.
pub fn validate(spec: &ParamSpec, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let value = match (spec, value) {
        (ParamSpec::None, None) => return Ok(None),
        (ParamSpec::None, Some(_)) => return Err(ValidationError::NoValueAccepted),
        (_, None) => return Err(ValidationError::MissingValue),
        (_, Some(value)) => value,
    };

    match *spec {
        ParamSpec::IntegerRange(min, max) => {
            let v = parse_integer(value)?;
            if (min..=max).contains(&v) {
                Ok(Some(v.to_string()))
            } else {
                Err(ValidationError::OutOfRange { value: v, min, max })
            }
        }
        ParamSpec::GreaterThan(min) => {
            let v = parse_integer(value)?;
            if v > min {
                Ok(Some(v.to_string()))
            } else {
                Err(ValidationError::NotGreaterThan { value: v, min })
            }
        }
        _ => Ok(Some(value.to_string())),
    }
}

pub type ResponseValues = BTreeMap<String, String>;

/// Static definition of one controllable device function.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    pub group: Option<String>,
    pub description: String,
    pub comments: Option<String>,
    pub function_code: u16,
    pub control_type: ControlType,
    pub parameter_spec: ParamSpec,
    pub response_values: Option<ResponseValues>,
}

impl CommandDescriptor {
    pub fn new(
        control_type: ControlType,
        function_code: u16,
        parameter_spec: ParamSpec,
        description: &str,
    ) -> Self {
        CommandDescriptor {
            group: None,
            description: description.to_string(),
            comments: None,
            function_code,
            control_type,
            parameter_spec,
            response_values: None,
        }
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn values(mut self, values: &[(&str, &str)]) -> Self {
        self.response_values = Some(
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn supports(&self, kind: ActionKind) -> bool {
        self.control_type.opcode(kind).is_some()
    }
}

impl Display for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:6} {:3} {:>10} ",
            self.control_type, self.function_code, self.parameter_spec
        )?;
        if let Some(group) = &self.group {
            write!(f, "{}: ", group)?;
        }
        self.description.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Get,
    Set,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Get => "get".fmt(f),
            ActionKind::Set => "set".fmt(f),
        }
    }
}

/// Run-wide action. `Set(None)` fires a parameterless trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Get,
    Set(Option<String>),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Get => ActionKind::Get,
            Action::Set(_) => ActionKind::Set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(spec: ParamSpec, value: &str) -> Result<Option<String>, ValidationError> {
        validate(&spec, Some(value))
    }

    #[test]
    fn range_accepts_bounds_and_rejects_outside() {
        let spec = ParamSpec::IntegerRange(-10, 10);
        for v in -10..=10 {
            assert_eq!(check(spec, &v.to_string()), Ok(Some(v.to_string())));
        }
        assert_eq!(
            check(spec, "-11"),
            Err(ValidationError::OutOfRange {
                value: -11,
                min: -10,
                max: 10
            })
        );
        assert!(check(spec, "11").is_err());
    }

    #[test]
    fn greater_than_is_strict() {
        let spec = ParamSpec::GreaterThan(100);
        assert!(check(spec, "100").is_err());
        assert!(check(spec, "99").is_err());
        assert_eq!(check(spec, "101"), Ok(Some("101".to_string())));
    }

    #[test]
    fn integer_specs_reject_text() {
        assert_eq!(
            check(ParamSpec::IntegerRange(0, 1), "on"),
            Err(ValidationError::NotAnInteger("on".to_string()))
        );
        assert!(check(ParamSpec::GreaterThan(0), "1.5").is_err());
    }

    #[test]
    fn any_passes_through_unchanged() {
        assert_eq!(check(ParamSpec::Any, "1080i"), Ok(Some("1080i".to_string())));
        assert_eq!(
            validate(&ParamSpec::Any, None),
            Err(ValidationError::MissingValue)
        );
    }

    #[test]
    fn triggers_take_no_value() {
        assert_eq!(
            check(ParamSpec::None, "1"),
            Err(ValidationError::NoValueAccepted)
        );
        assert_eq!(validate(&ParamSpec::None, None), Ok(None));
    }

    #[test]
    fn control_type_lookup() {
        assert_eq!(
            ControlType::from_opcodes(Some(4), Some(3)),
            Some(ControlType::SetB)
        );
        assert_eq!(ControlType::from_opcodes(None, Some(5)), Some(ControlType::Five));
        assert_eq!(ControlType::from_opcodes(Some(9), None), None);
        assert_eq!("SET_C".parse::<ControlType>().unwrap(), ControlType::SetC);
        assert!("six".parse::<ControlType>().is_err());
    }

    #[test]
    fn pure_action_families_cannot_be_queried() {
        let cmd = CommandDescriptor::new(ControlType::Five, 0, ParamSpec::None, "Normal");
        assert!(!cmd.supports(ActionKind::Get));
        assert!(cmd.supports(ActionKind::Set));
        assert!(!CommandDescriptor::new(ControlType::Eight, 0, ParamSpec::None, "Res")
            .supports(ActionKind::Set));
    }
}
