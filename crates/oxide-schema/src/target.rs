//! Output targets for generated statements.
//!
//! A target consumes statements between a `prepare` and a `release` call.
//! [`TargetSet`] fans every statement out to a list of targets so that each
//! one sees exactly the same sequence.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DropError, Result};

/// A consumer of generated statements.
pub trait Target {
    /// Returns whether this target also wants import-script actions.
    ///
    /// Drop generation never produces such actions; the flag is shared with
    /// create generation.
    fn accepts_import_script_actions(&self) -> bool;

    /// Called once before the first statement.
    fn prepare(&mut self) -> Result<()>;

    /// Called once per statement, in order.
    fn accept(&mut self, statement: &str) -> Result<()>;

    /// Called once after the last statement.
    fn release(&mut self) -> Result<()>;
}

/// Collects statements in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingTarget {
    statements: Vec<String>,
}

impl CollectingTarget {
    /// Creates an empty collecting target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statements collected so far.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Consumes the target and returns the collected statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<String> {
        self.statements
    }
}

impl Target for CollectingTarget {
    fn accepts_import_script_actions(&self) -> bool {
        true
    }

    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn accept(&mut self, statement: &str) -> Result<()> {
        self.statements.push(statement.to_string());
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes statements to any [`Write`] implementation, one per line.
#[derive(Debug)]
pub struct WriterTarget<W: Write> {
    writer: W,
    delimiter: String,
}

impl<W: Write> WriterTarget<W> {
    /// Creates a target writing to `writer` without a delimiter.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            delimiter: String::new(),
        }
    }

    /// Sets the text written after every statement (e.g. `";"`).
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Consumes the target and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterTarget<io::Stdout> {
    /// Creates a target writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Target for WriterTarget<W> {
    fn accepts_import_script_actions(&self) -> bool {
        true
    }

    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn accept(&mut self, statement: &str) -> Result<()> {
        writeln!(self.writer, "{}{}", statement, self.delimiter)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes statements to a script file.
///
/// The file is created (or truncated) on `prepare` and closed on `release`.
#[derive(Debug)]
pub struct FileTarget {
    path: PathBuf,
    delimiter: String,
    writer: Option<BufWriter<File>>,
}

impl FileTarget {
    /// Creates a target for the given script path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: String::new(),
            writer: None,
        }
    }

    /// Sets the text written after every statement (e.g. `";"`).
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Returns the script path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Target for FileTarget {
    fn accepts_import_script_actions(&self) -> bool {
        true
    }

    fn prepare(&mut self) -> Result<()> {
        debug!(path = %self.path.display(), "Opening script file");
        self.writer = Some(BufWriter::new(File::create(&self.path)?));
        Ok(())
    }

    fn accept(&mut self, statement: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| DropError::TargetNotPrepared(self.path.display().to_string()))?;
        writeln!(writer, "{}{}", statement, self.delimiter)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Broadcasts statements to an ordered list of targets.
pub struct TargetSet<'t, 'a> {
    targets: &'t mut [&'a mut dyn Target],
}

impl<'t, 'a> TargetSet<'t, 'a> {
    /// Wraps a list of targets. An empty list discards everything.
    pub fn new(targets: &'t mut [&'a mut dyn Target]) -> Self {
        Self { targets }
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Prepares every target in order.
    ///
    /// If a target fails to prepare, the targets prepared before it are
    /// released before the error is returned.
    pub fn prepare_all(&mut self) -> Result<()> {
        for idx in 0..self.targets.len() {
            if let Err(err) = self.targets[idx].prepare() {
                let released = release_targets(&mut self.targets[..idx]);
                return Err(combine(err, released));
            }
        }
        Ok(())
    }

    /// Sends one statement to every target in order.
    pub fn broadcast(&mut self, statement: &str) -> Result<()> {
        for target in self.targets.iter_mut() {
            target.accept(statement)?;
        }
        Ok(())
    }

    /// Sends a batch of statements, each to every target, preserving order.
    pub fn broadcast_all(&mut self, statements: &[String]) -> Result<()> {
        for statement in statements {
            debug!(sql = %statement, "Emitting statement");
            self.broadcast(statement)?;
        }
        Ok(())
    }

    /// Releases every target in order.
    ///
    /// Every target is released even if an earlier one fails.
    pub fn release_all(&mut self) -> Result<()> {
        release_targets(self.targets)
    }
}

fn release_targets(targets: &mut [&mut dyn Target]) -> Result<()> {
    let mut errors: Vec<DropError> = targets
        .iter_mut()
        .filter_map(|target| target.release().err())
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(DropError::Multiple(errors)),
    }
}

/// Attaches a cleanup failure to the error that caused the cleanup.
pub(crate) fn combine(primary: DropError, cleanup: Result<()>) -> DropError {
    match cleanup {
        Ok(()) => primary,
        Err(DropError::Multiple(mut errors)) => {
            errors.insert(0, primary);
            DropError::Multiple(errors)
        }
        Err(err) => DropError::Multiple(vec![primary, err]),
    }
}
