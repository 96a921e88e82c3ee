//! Interactive policy: ask a decision-maker and block until it answers.
//!
//! The decision-maker is any [`PromptChannel`]. [`TerminalPrompt`] asks over
//! any reader/writer pair, [`StdioPrompt`] asks a human on the terminal and
//! [`FnPrompt`] wraps a plain callback. When no
//! channel is available every conflict is unresolvable.

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::{info, warn};

use super::{ConflictError, ConflictResolver, ModuleConflict, Resolution};

/// Synchronous source of conflict decisions.
pub trait PromptChannel {
    /// Ask for a decision. Blocks until one is available.
    fn ask(&mut self, conflict: &ModuleConflict) -> io::Result<Resolution>;
}

/// Adapter turning a callback into a [`PromptChannel`].
pub struct FnPrompt<F>(pub F);

impl<F> PromptChannel for FnPrompt<F>
where
    F: FnMut(&ModuleConflict) -> Resolution,
{
    fn ask(&mut self, conflict: &ModuleConflict) -> io::Result<Resolution> {
        Ok((self.0)(conflict))
    }
}

/// Line-oriented prompt: answer `0` to use the source, anything else keeps the target.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Create a prompt over arbitrary reader/writer.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> PromptChannel for TerminalPrompt<R, W> {
    fn ask(&mut self, conflict: &ModuleConflict) -> io::Result<Resolution> {
        prompt_once(&mut self.input, &mut self.output, conflict)
    }
}

/// [`TerminalPrompt`] over the process's stdin, writing to stderr.
///
/// Stdin is locked only while a question is pending. Stdout stays free for
/// the caller's own output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioPrompt;

impl StdioPrompt {
    /// Create a prompt on the process's standard streams.
    pub fn new() -> Self {
        Self
    }
}

impl PromptChannel for StdioPrompt {
    fn ask(&mut self, conflict: &ModuleConflict) -> io::Result<Resolution> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        prompt_once(&mut input, &mut io::stderr().lock(), conflict)
    }
}

fn prompt_once(
    input: &mut impl BufRead,
    output: &mut impl Write,
    conflict: &ModuleConflict,
) -> io::Result<Resolution> {
    writeln!(output, "{conflict}. Please advise: 0 to use source, 1 to keep target.")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before a decision was given",
        ));
    }

    Ok(if line.trim() == "0" {
        Resolution::PreferSource
    } else {
        Resolution::PreferTarget
    })
}

/// Resolver that defers every conflict to a [`PromptChannel`].
pub struct InteractiveResolver {
    channel: Option<Box<dyn PromptChannel>>,
}

impl InteractiveResolver {
    /// Resolver backed by `channel`.
    pub fn new(channel: impl PromptChannel + 'static) -> Self {
        Self {
            channel: Some(Box::new(channel)),
        }
    }

    /// Resolver with no channel: every conflict fails.
    pub fn without_channel() -> Self {
        Self { channel: None }
    }

    /// Use a terminal prompt when stdin is a terminal, otherwise no channel.
    pub fn from_terminal() -> Self {
        if io::stdin().is_terminal() {
            Self::new(StdioPrompt::new())
        } else {
            Self::without_channel()
        }
    }

    /// Whether a decision channel is attached.
    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }
}

impl ConflictResolver for InteractiveResolver {
    fn resolve(&mut self, conflict: &ModuleConflict) -> Result<Resolution, ConflictError> {
        let Some(channel) = self.channel.as_mut() else {
            warn!(
                target_project = %conflict.target_project,
                source_project = %conflict.source_project,
                module = %conflict.module,
                "Conflict with no decision channel"
            );
            return Err(ConflictError::Unresolvable(conflict.clone()));
        };

        let resolution = channel.ask(conflict).map_err(|source| ConflictError::Prompt {
            module: conflict.module.clone(),
            source,
        })?;

        info!(module = %conflict.module, resolution = ?resolution, "Conflict resolved interactively");
        Ok(resolution)
    }

    fn name(&self) -> &'static str {
        "interactive"
    }
}
