use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{Error, Result};

/// Mutable evaluation context for one interpreter run
///
/// Holds the variable table, the names of the loops currently executing
/// (innermost last) and the pending-break marker that unwinds statement
/// sequences until the named loop absorbs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramState {
    /// Variable bindings, ordered for deterministic dumps
    variables: BTreeMap<String, f64>,
    /// Names of active loops, innermost last
    loop_stack: Vec<String>,
    /// Loop name a BREAK is unwinding towards
    pending_break: Option<String>,
}

impl ProgramState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value of a variable
    pub fn get(&self, name: &str) -> Result<f64> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Creates or updates a binding
    pub fn assign(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_string(), value);
    }

    /// Checks if a variable has been assigned
    pub fn is_defined(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// All bindings in alphabetical order
    pub fn variables(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Enters a loop
    pub fn push_loop(&mut self, name: &str) {
        tracing::trace!(loop_name = name, depth = self.loop_stack.len() + 1, "enter loop");
        self.loop_stack.push(name.to_string());
    }

    /// Removes the innermost loop name
    pub fn pop_loop(&mut self) -> Option<String> {
        let name = self.loop_stack.pop()?;
        tracing::trace!(loop_name = %name, depth = self.loop_stack.len(), "leave loop");
        Some(name)
    }

    /// Number of active loops
    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    /// Name of the innermost active loop
    pub fn innermost_loop(&self) -> Option<&str> {
        self.loop_stack.last().map(String::as_str)
    }

    /// Loop name a BREAK is currently unwinding towards
    pub fn pending_break(&self) -> Option<&str> {
        self.pending_break.as_deref()
    }

    /// True while a BREAK is unwinding; sequencing points must not run siblings
    pub fn is_unwinding(&self) -> bool {
        self.pending_break.is_some()
    }

    /// Pops loop frames for a BREAK and marks the removed loop as pending
    ///
    /// With no target only the innermost loop is removed; with a target,
    /// frames are removed until one with that name has been popped.
    pub fn raise_break(&mut self, target: Option<&str>) -> Result<()> {
        let underflow = || Error::LoopStackUnderflow {
            target: target.map(str::to_string),
        };

        let removed = match target {
            None => self.pop_loop().ok_or_else(underflow)?,
            Some(target) => loop {
                let name = self.pop_loop().ok_or_else(underflow)?;
                if name == target {
                    break name;
                }
            },
        };

        tracing::trace!(loop_name = %removed, remaining = self.loop_stack.len(), "break raised");
        self.pending_break = Some(removed);
        Ok(())
    }

    /// Clears the pending break if it names `loop_name`; returns whether it did
    pub fn clear_break(&mut self, loop_name: &str) -> bool {
        if self.pending_break.as_deref() == Some(loop_name) {
            tracing::trace!(loop_name, "break absorbed");
            self.pending_break = None;
            true
        } else {
            false
        }
    }

    /// Writes `Symbol Table:` followed by one `name = value` line per binding
    pub fn dump<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Symbol Table:")?;
        for (name, value) in self.variables() {
            writeln!(out, "{} = {}", name, value)?;
        }
        Ok(())
    }
}
