//! Starlark parser using tree-sitter-starlark

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Parser for settings and build scripts
pub struct ScriptParser {
    parser: Parser,
}

impl ScriptParser {
    /// Create a new Starlark parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_starlark::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| Error::ParseError(format!("Failed to set Starlark language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Read and parse a script file
    pub fn parse_file(&mut self, file: &Path) -> Result<ScriptAst> {
        let content = std::fs::read_to_string(file)?;
        self.parse(file, &content)
    }

    /// Parse script content; `file` is only used for diagnostics
    pub fn parse(&mut self, file: &Path, content: &str) -> Result<ScriptAst> {
        let tree = self.parser.parse(content, None).ok_or_else(|| Error::ScriptParse {
            file: file.to_path_buf(),
            line: 1,
            message: "parsing was cancelled".to_string(),
        })?;

        if tree.root_node().has_error() {
            let line = first_error(tree.root_node())
                .map(|node| node.start_position().row + 1)
                .unwrap_or(1);
            return Err(Error::ScriptParse {
                file: file.to_path_buf(),
                line,
                message: "script contains syntax errors".to_string(),
            });
        }

        Ok(ScriptAst {
            tree,
            source: content.to_string(),
            file: file.to_path_buf(),
        })
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Parsed Starlark AST
pub struct ScriptAst {
    pub tree: Tree,
    pub source: String,
    pub file: PathBuf,
}

impl ScriptAst {
    /// Get the root node of the AST
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get a slice of the source code for a node
    pub fn node_text<'a>(&'a self, node: &Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}
