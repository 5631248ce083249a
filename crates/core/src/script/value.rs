use crate::types::ProjectPath;
use std::fmt;
use std::path::PathBuf;

/// Runtime values of the script language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Path(PathBuf),
    /// Handle to a project descriptor, by path
    Project(ProjectPath),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Path(_) => "path",
            Value::Project(_) => "project",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Path(_) | Value::Project(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Project(path) => write!(f, "project '{path}'"),
        }
    }
}

/// Arguments of a call expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keyword: Vec<(String, Value)>,
}

impl Arguments {
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Positional argument `index` as a string, or a descriptive error
    pub fn string_at(&self, function: &str, index: usize) -> std::result::Result<&str, String> {
        match self.positional.get(index) {
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(format!(
                "{function}() expects a string as argument {}, got {}",
                index + 1,
                other.type_name()
            )),
            None => Err(format!(
                "{function}() is missing required argument {}",
                index + 1
            )),
        }
    }

    /// Every positional argument as a string
    pub fn strings(&self, function: &str) -> std::result::Result<Vec<&str>, String> {
        (0..self.positional.len())
            .map(|i| self.string_at(function, i))
            .collect()
    }
}
