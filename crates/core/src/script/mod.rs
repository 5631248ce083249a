//! Starlark scripting for settings and build descriptions

pub mod interpreter;
pub mod parser;
pub mod value;

pub use interpreter::{run, ScriptHost};
pub use parser::{ScriptAst, ScriptParser};
pub use value::{Arguments, Value};
