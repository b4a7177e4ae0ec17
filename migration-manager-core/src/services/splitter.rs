//! Statement splitter - turns one block of a migration file into statements
//!
//! A migration file holds an `-- UP` block followed by a `-- DOWN` block.
//! Statements end at the active delimiter, `;` by default. Inside the UP
//! block a `DELIMITER <token>` line switches the delimiter for the rest of
//! that block, which lets stored-routine bodies carry their own `;`:
//!
//! ```text
//! -- UP
//! DELIMITER $$
//! CREATE PROCEDURE p()
//! BEGIN
//!   SELECT 1;
//! END$$
//! -- DOWN
//! DROP PROCEDURE p;
//! ```
//!
//! Every occurrence of a custom delimiter is rewritten to `;` before the
//! statement is handed to the database. DOWN blocks ignore the directive and
//! always split on `;`.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, MigrationId};

pub const DEFAULT_DELIMITER: &str = ";";

/// Statements parsed from one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlock {
    /// Statements in order of appearance, terminators normalized to `;`
    pub statements: Vec<String>,
    /// Text left over at the end of the block without a delimiter.
    /// It is never executed.
    pub trailing: Option<String>,
}

fn delimiter_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*delimiter\s+(\S.*?)\s*$").expect("valid regex"))
}

/// New delimiter named by a `DELIMITER <token>` line, if `line` is one.
/// The token is the rest of the line with surrounding whitespace removed.
pub fn delimiter_directive(line: &str) -> Option<&str> {
    delimiter_directive_re()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split the `direction` block of a migration file.
///
/// Fails with `BlockNotFound` when no line carries the block's marker.
pub fn split_block(id: &MigrationId, source: &str, direction: Direction) -> Result<ParsedBlock> {
    let mut lines = source.lines();
    if !lines.by_ref().any(|line| line.contains(direction.marker())) {
        return Err(Error::BlockNotFound {
            id: id.to_string(),
            direction,
        });
    }

    let mut delimiter = DEFAULT_DELIMITER.to_string();
    let mut statements = Vec::new();
    let mut buffer = String::new();

    for line in lines {
        if direction == Direction::Up {
            if line.contains(Direction::Down.marker()) {
                break;
            }
            if let Some(token) = delimiter_directive(line) {
                delimiter = token.to_string();
                continue;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        buffer.push_str(line);
        buffer.push('\n');

        if line.contains(delimiter.as_str()) {
            let statement = if delimiter == DEFAULT_DELIMITER {
                std::mem::take(&mut buffer)
            } else {
                let normalized = buffer.replace(delimiter.as_str(), DEFAULT_DELIMITER);
                buffer.clear();
                normalized
            };
            statements.push(statement);
        }
    }

    let trailing = if buffer.trim().is_empty() {
        None
    } else {
        Some(buffer)
    };

    Ok(ParsedBlock {
        statements,
        trailing,
    })
}
