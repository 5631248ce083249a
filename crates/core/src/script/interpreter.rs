//! Tree-walking evaluation of parsed scripts
//!
//! The interpreter knows the syntax; everything a script can observe or
//! mutate is supplied by a [`ScriptHost`].

use super::parser::ScriptAst;
use super::value::{Arguments, Value};
use crate::error::{Error, Result};
use std::collections::HashMap;
use tree_sitter::Node;

/// Host-side surface of a script: globals, functions and attributes.
///
/// Host errors are plain messages; the interpreter attaches file and line.
pub trait ScriptHost {
    fn global(&self, name: &str) -> Option<Value>;

    fn call(&mut self, function: &str, args: Arguments, line: usize) -> std::result::Result<Value, String>;

    fn get_attr(&self, target: &Value, attr: &str) -> std::result::Result<Value, String>;

    fn set_attr(&mut self, target: &Value, attr: &str, value: Value) -> std::result::Result<(), String>;
}

/// Evaluate every statement of `ast` against `host`
pub fn run<H: ScriptHost>(ast: &ScriptAst, host: &mut H) -> Result<()> {
    let mut interpreter = Interpreter {
        ast,
        host,
        locals: HashMap::new(),
    };
    interpreter.exec(ast.root())
}

struct Interpreter<'a, H: ScriptHost> {
    ast: &'a ScriptAst,
    host: &'a mut H,
    locals: HashMap<String, Value>,
}

impl<'a, H: ScriptHost> Interpreter<'a, H> {
    fn exec(&mut self, node: Node<'a>) -> Result<()> {
        match node.kind() {
            "module" | "expression_statement" => {
                for child in named_children(node) {
                    self.exec(child)?;
                }
                Ok(())
            }
            "assignment" => self.assign(node),
            "comment" | "pass_statement" => Ok(()),
            _ => self.eval(node).map(|_| ()),
        }
    }

    fn assign(&mut self, node: Node<'a>) -> Result<()> {
        let left = node
            .child_by_field_name("left")
            .ok_or_else(|| self.error(node, "assignment without a target".to_string()))?;
        let right = node
            .child_by_field_name("right")
            .ok_or_else(|| self.error(node, "assignment without a value".to_string()))?;
        let value = self.eval(right)?;

        match left.kind() {
            "identifier" => {
                let name = self.ast.node_text(&left).to_string();
                self.locals.insert(name, value);
                Ok(())
            }
            "attribute" => {
                let (object, attr) = self.attribute_parts(left)?;
                let target = self.eval(object)?;
                self.host
                    .set_attr(&target, attr, value)
                    .map_err(|message| self.error(left, message))
            }
            other => Err(self.error(left, format!("cannot assign to '{other}'"))),
        }
    }

    fn eval(&mut self, node: Node<'a>) -> Result<Value> {
        match node.kind() {
            "string" => Ok(Value::Str(string_literal(self.ast.node_text(&node)))),
            "concatenated_string" => {
                let joined = named_children(node)
                    .into_iter()
                    .map(|part| string_literal(self.ast.node_text(&part)))
                    .collect::<String>();
                Ok(Value::Str(joined))
            }
            "integer" => self
                .ast
                .node_text(&node)
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| self.error(node, format!("invalid integer: {e}"))),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "none" => Ok(Value::None),
            "list" | "tuple" => {
                let mut items = Vec::new();
                for child in named_children(node) {
                    if child.kind() != "comment" {
                        items.push(self.eval(child)?);
                    }
                }
                Ok(Value::List(items))
            }
            "parenthesized_expression" => match named_children(node).into_iter().find(|c| c.kind() != "comment") {
                Some(inner) => self.eval(inner),
                None => Ok(Value::List(Vec::new())),
            },
            "identifier" => {
                let name = self.ast.node_text(&node);
                if let Some(value) = self.locals.get(name) {
                    return Ok(value.clone());
                }
                self.host
                    .global(name)
                    .ok_or_else(|| self.error(node, format!("Could not get unknown property '{name}'.")))
            }
            "attribute" => {
                let (object, attr) = self.attribute_parts(node)?;
                let target = self.eval(object)?;
                self.host
                    .get_attr(&target, attr)
                    .map_err(|message| self.error(node, message))
            }
            "binary_operator" => self.binary(node),
            "call" => self.call(node),
            other => Err(self.error(node, format!("unsupported syntax '{other}'"))),
        }
    }

    fn binary(&mut self, node: Node<'a>) -> Result<Value> {
        let (Some(left), Some(op), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return Err(self.error(node, "malformed binary expression".to_string()));
        };
        let op = self.ast.node_text(&op);
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        match (op, lhs, rhs) {
            ("+", Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            ("+", Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .ok_or_else(|| self.error(node, "integer overflow".to_string())),
            ("+", Value::List(mut a), Value::List(b)) => {
                a.extend(b);
                Ok(Value::List(a))
            }
            (op, a, b) => Err(self.error(
                node,
                format!(
                    "unsupported operand types for {op}: '{}' and '{}'",
                    a.type_name(),
                    b.type_name()
                ),
            )),
        }
    }

    fn call(&mut self, node: Node<'a>) -> Result<Value> {
        let function = node
            .child_by_field_name("function")
            .ok_or_else(|| self.error(node, "call without a function".to_string()))?;
        if function.kind() != "identifier" {
            return Err(self.error(
                function,
                format!("'{}' is not callable", self.ast.node_text(&function)),
            ));
        }
        let name = self.ast.node_text(&function);

        let mut args = Arguments::default();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            for child in named_children(arguments) {
                match child.kind() {
                    "comment" => {}
                    "keyword_argument" => {
                        let (Some(key), Some(value)) = (
                            child.child_by_field_name("name"),
                            child.child_by_field_name("value"),
                        ) else {
                            return Err(self.error(child, "malformed keyword argument".to_string()));
                        };
                        let key = self.ast.node_text(&key).to_string();
                        let value = self.eval(value)?;
                        args.keyword.push((key, value));
                    }
                    _ => {
                        let value = self.eval(child)?;
                        args.positional.push(value);
                    }
                }
            }
        }

        let line = node.start_position().row + 1;
        self.host
            .call(name, args, line)
            .map_err(|message| self.error(node, message))
    }

    fn attribute_parts(&self, node: Node<'a>) -> Result<(Node<'a>, &'a str)> {
        match (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) {
            (Some(object), Some(attr)) => Ok((object, self.ast.node_text(&attr))),
            _ => Err(self.error(node, "malformed attribute access".to_string())),
        }
    }

    fn error(&self, node: Node<'_>, message: String) -> Error {
        Error::ScriptEvaluation {
            file: self.ast.file.clone(),
            line: node.start_position().row + 1,
            message,
        }
    }
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Decode a string literal, including its quotes and optional prefix
fn string_literal(text: &str) -> String {
    let body_start = text.find(['"', '\'']).unwrap_or(0);
    let raw = text[..body_start].contains(['r', 'R']);
    let quoted = &text[body_start..];

    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|quote| {
            quoted
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(quoted);

    if raw {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
