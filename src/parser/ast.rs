// Command tree definitions for the tape interpreter

use rustc_hash::FxHashMap;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single instruction of the tape language.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` walk loop bodies with an explicit
/// stack, so nesting depth is bounded by memory and not by the host stack.
pub enum Command {
    MoveRight,   // >
    MoveLeft,    // <
    Increment,   // +
    Decrement,   // -
    ReadInput,   // ,
    WriteOutput, // .
    Loop(Vec<Command>),
}

impl Command {
    /// The source character this command was parsed from.
    ///
    /// Loops report their opening bracket.
    pub fn symbol(&self) -> char {
        match self {
            Command::MoveRight => '>',
            Command::MoveLeft => '<',
            Command::Increment => '+',
            Command::Decrement => '-',
            Command::ReadInput => ',',
            Command::WriteOutput => '.',
            Command::Loop(_) => '[',
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::MoveRight => "MoveRight",
            Command::MoveLeft => "MoveLeft",
            Command::Increment => "Increment",
            Command::Decrement => "Decrement",
            Command::ReadInput => "ReadInput",
            Command::WriteOutput => "WriteOutput",
            Command::Loop(_) => "Loop",
        }
    }
}

/// Indices from the top-level sequence down through loop bodies.
///
/// `[2, 0]` is the first command in the body of the loop at top-level index 2.
pub type CommandPath = Vec<usize>;

/// Maps commands back to the characters they were parsed from
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    commands: FxHashMap<CommandPath, SourceLocation>,
    loop_ends: FxHashMap<CommandPath, SourceLocation>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_command(&mut self, path: CommandPath, location: SourceLocation) {
        self.commands.insert(path, location);
    }

    pub(crate) fn record_loop_end(&mut self, path: CommandPath, location: SourceLocation) {
        self.loop_ends.insert(path, location);
    }

    /// Location of the command at `path`
    pub fn command(&self, path: &[usize]) -> Option<SourceLocation> {
        self.commands.get(path).copied()
    }

    /// Location of the closing bracket of the loop at `path`
    pub fn loop_end(&self, path: &[usize]) -> Option<SourceLocation> {
        self.loop_ends.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A parsed program
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub commands: Vec<Command>,
    pub source_map: SourceMap,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of commands, counting loop bodies
    pub fn command_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&[Command]> = vec![&self.commands];
        while let Some(seq) = pending.pop() {
            count += seq.len();
            for cmd in seq {
                if let Command::Loop(body) = cmd {
                    pending.push(body);
                }
            }
        }
        count
    }

    /// Deepest loop nesting in the program
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&[Command], usize)> = vec![(&self.commands, 0)];
        while let Some((seq, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            for cmd in seq {
                if let Command::Loop(body) = cmd {
                    pending.push((body, depth + 1));
                }
            }
        }
        deepest
    }
}

impl Clone for Command {
    fn clone(&self) -> Self {
        match self {
            Command::MoveRight => Command::MoveRight,
            Command::MoveLeft => Command::MoveLeft,
            Command::Increment => Command::Increment,
            Command::Decrement => Command::Decrement,
            Command::ReadInput => Command::ReadInput,
            Command::WriteOutput => Command::WriteOutput,
            Command::Loop(body) => Command::Loop(clone_sequence(body)),
        }
    }
}

/// Copy a command sequence one nesting level at a time
fn clone_sequence(sequence: &[Command]) -> Vec<Command> {
    let mut stack = vec![(sequence.iter(), Vec::with_capacity(sequence.len()))];
    let mut cloned = Vec::new();

    while let Some((remaining, built)) = stack.last_mut() {
        match remaining.next() {
            Some(Command::Loop(body)) => {
                stack.push((body.iter(), Vec::with_capacity(body.len())));
            }
            // Leaves clone without recursing
            Some(leaf) => built.push(leaf.clone()),
            None => {
                let body = std::mem::take(built);
                stack.pop();
                match stack.last_mut() {
                    Some((_, parent)) => parent.push(Command::Loop(body)),
                    None => cloned = body,
                }
            }
        }
    }
    cloned
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&[Command], &[Command])> =
            vec![(std::slice::from_ref(self), std::slice::from_ref(other))];

        while let Some((left, right)) = pending.pop() {
            if left.len() != right.len() {
                return false;
            }
            for (a, b) in left.iter().zip(right) {
                match (a, b) {
                    (Command::Loop(x), Command::Loop(y)) => {
                        pending.push((x.as_slice(), y.as_slice()))
                    }
                    _ if std::mem::discriminant(a) == std::mem::discriminant(b) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for Command {}

/// Same text as a derived `Debug`, e.g. `Loop([Increment, Loop([])])`
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![std::slice::from_ref(self).iter()];
        let mut first_in_list = true;

        while let Some(remaining) = stack.last_mut() {
            match remaining.next() {
                Some(command) => {
                    if !first_in_list {
                        f.write_str(", ")?;
                    }
                    f.write_str(command.name())?;
                    if let Command::Loop(body) = command {
                        f.write_str("([")?;
                        stack.push(body.iter());
                        first_in_list = true;
                    } else {
                        first_in_list = false;
                    }
                }
                None => {
                    stack.pop();
                    if !stack.is_empty() {
                        f.write_str("])")?;
                    }
                    first_in_list = false;
                }
            }
        }
        Ok(())
    }
}

// Deeply nested loops would otherwise recurse once per level when dropped.
impl Drop for Command {
    fn drop(&mut self) {
        if let Command::Loop(body) = self {
            let mut pending = std::mem::take(body);
            while let Some(mut cmd) = pending.pop() {
                if let Command::Loop(inner) = &mut cmd {
                    pending.append(inner);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(depth: usize) -> Command {
        let mut command = Command::Increment;
        for _ in 0..depth {
            command = Command::Loop(vec![command]);
        }
        command
    }

    #[test]
    fn test_debug_matches_derived_form() {
        let command = Command::Loop(vec![
            Command::Increment,
            Command::Loop(vec![]),
            Command::Loop(vec![Command::MoveLeft, Command::WriteOutput]),
            Command::Decrement,
        ]);
        assert_eq!(
            format!("{:?}", command),
            "Loop([Increment, Loop([]), Loop([MoveLeft, WriteOutput]), Decrement])"
        );
        assert_eq!(
            format!("{:?}", vec![Command::ReadInput, Command::MoveRight]),
            "[ReadInput, MoveRight]"
        );
    }

    #[test]
    fn test_equality_compares_structure() {
        let a = Command::Loop(vec![Command::Increment, Command::Loop(vec![])]);
        assert_eq!(a, a.clone());
        assert_ne!(a, Command::Loop(vec![Command::Increment]));
        assert_ne!(
            a,
            Command::Loop(vec![Command::Decrement, Command::Loop(vec![])])
        );
        assert_ne!(
            a,
            Command::Loop(vec![Command::Increment, Command::Increment])
        );
        assert_ne!(Command::Loop(vec![]), Command::Increment);
    }

    #[test]
    fn test_deep_nesting_stays_off_the_call_stack() {
        let depth = 100_000;
        let command = nested(depth);

        let copy = command.clone();
        assert!(copy == command);
        assert!(copy != nested(depth - 1));

        let text = format!("{:?}", copy);
        assert_eq!(text.len(), depth * "Loop([])".len() + "Increment".len());
        assert!(text.starts_with("Loop([Loop(["));
        assert!(text.ends_with("Increment])])"));

        let program = Program {
            commands: vec![command],
            source_map: SourceMap::new(),
        };
        assert_eq!(program.clone().max_depth(), depth);
    }
}
