//! Command manager: authoritative state, undo/redo stacks, merge and batch
//! policy.
//!
//! The manager owns the one live [`FormBuilderState`] of an editing session.
//! All mutation flows through [`CommandManager::execute_command`]; undo and
//! redo are synchronous, single-threaded calls guarded against reentrant
//! dispatch. Expected empty-operation conditions (undo with nothing to
//! undo) come back as failed [`CommandResult`]s; contract violations raised
//! by a command are converted to failed results and forwarded to the error
//! callback.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use formkit_core::constants::{BATCH_DELAY_MS, DEFAULT_MAX_HISTORY, MERGE_WINDOW_MS};
use formkit_core::{
    EditorEvent, Error, EventHub, FormBuilderState, Result,
};

use crate::commands::{CommandRecord, FormCommand};

/// Tuning knobs for history and batching.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManagerConfig {
    /// Bound on each history stack. Oldest entries drop silently past it.
    pub max_history: usize,
    /// Whether rapid mergeable commands are collected into a pending batch.
    pub batching: bool,
    /// Quiet period before a pending batch flushes to history.
    pub batch_delay: Duration,
    /// Merge window for property-update commands, in milliseconds.
    pub merge_window_ms: i64,
    /// Commit each command's state immediately (`true`) or stage it until
    /// [`CommandManager::commit_staged`] (`false`).
    pub optimistic: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            batching: true,
            batch_delay: Duration::from_millis(BATCH_DELAY_MS),
            merge_window_ms: MERGE_WINDOW_MS,
            optimistic: true,
        }
    }
}

/// Inverse of an executed command, for optimistic-update failure recovery.
///
/// Wraps the executed command's own undo; applying the rollback restores
/// the state from before the execution.
#[derive(Debug, Clone)]
pub struct RollbackCommand {
    command: FormCommand,
}

impl RollbackCommand {
    /// Restores the state from before the wrapped command ran.
    pub fn apply(&mut self, state: &mut FormBuilderState) -> Result<()> {
        self.command.undo(state)
    }

    /// Description of the command being rolled back.
    pub fn description(&self) -> String {
        self.command.description()
    }
}

/// Outcome of one execute/undo/redo call.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    /// The committed state after a successful operation.
    pub new_state: Option<FormBuilderState>,
    pub error: Option<String>,
    /// Present on successful executions; absent for undo/redo (their
    /// inverse is the opposite operation).
    pub rollback: Option<RollbackCommand>,
}

impl CommandResult {
    fn ok(state: FormBuilderState, rollback: Option<RollbackCommand>) -> Self {
        Self {
            success: true,
            new_state: Some(state),
            error: None,
            rollback,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            new_state: None,
            error: Some(error.into()),
            rollback: None,
        }
    }
}

type ErrorCallback = Box<dyn Fn(&Error) + Send + Sync>;

/// Owns the builder state plus undo/redo stacks and the merge/batch policy.
pub struct CommandManager {
    state: FormBuilderState,
    config: ManagerConfig,
    undo_stack: Vec<FormCommand>,
    redo_stack: Vec<FormCommand>,
    /// Mergeable run awaiting its debounce deadline.
    pending: Vec<FormCommand>,
    batch_deadline: Option<Instant>,
    /// Applied-but-unconfirmed state in non-optimistic mode.
    staged: Option<(FormBuilderState, FormCommand)>,
    executing: bool,
    recording: bool,
    events: EventHub,
    error_callback: Option<ErrorCallback>,
}

impl CommandManager {
    /// Creates a manager owning the given state, with default config.
    pub fn new(state: FormBuilderState) -> Self {
        Self::with_config(state, ManagerConfig::default())
    }

    /// Creates a manager with a custom configuration.
    pub fn with_config(state: FormBuilderState, config: ManagerConfig) -> Self {
        Self {
            state,
            config,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            batch_deadline: None,
            staged: None,
            executing: false,
            recording: true,
            events: EventHub::new(),
            error_callback: None,
        }
    }

    /// The authoritative state.
    pub fn state(&self) -> &FormBuilderState {
        &self.state
    }

    /// The manager configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The event hub; subscribe here for push-based flag updates.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Registers a callback receiving every error the manager swallows
    /// into a failed result.
    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.error_callback = Some(Box::new(callback));
    }

    /// Whether a command is currently being applied.
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    /// Derived undo-stack depth. Pending batched commands count once
    /// flushed.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Derived redo-stack depth.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether undo would succeed (pending batch included).
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.pending.is_empty()
    }

    /// Whether redo would succeed.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command undo would revert.
    pub fn undo_description(&self) -> Option<String> {
        self.pending
            .last()
            .or_else(|| self.undo_stack.last())
            .map(|c| c.description())
    }

    /// Description of the command redo would re-apply.
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Suspends history recording. Commands still execute.
    pub fn disable_recording(&mut self) {
        self.recording = false;
    }

    /// Resumes history recording.
    pub fn enable_recording(&mut self) {
        self.recording = true;
    }

    /// Whether history recording is on.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn report_error(&self, error: &Error) {
        if let Some(callback) = &self.error_callback {
            callback(error);
        }
    }

    fn trim_history(&mut self) {
        while self.undo_stack.len() > self.config.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Executes a command against the current state.
    ///
    /// Clears the redo stack, applies the command, and records it: merged
    /// into the undo-stack top, deferred into the pending batch, or pushed
    /// as a fresh entry, per the batching configuration.
    pub fn execute_command(&mut self, mut command: FormCommand) -> CommandResult {
        if self.executing {
            let error = Error::Command(formkit_core::CommandError::ReentrantDispatch {
                in_flight: "execute".to_string(),
            });
            self.report_error(&error);
            return CommandResult::failed(error.to_string());
        }
        self.commit_staged();
        self.executing = true;

        self.redo_stack.clear();

        let description = command.description();
        debug!(command = %description, "executing command");

        if !self.config.optimistic {
            let mut staged_state = self.state.clone();
            if let Err(error) = command.apply(&mut staged_state) {
                self.executing = false;
                self.report_error(&error);
                self.events.publish(&EditorEvent::ExecutionFailed {
                    description,
                    error: error.to_string(),
                });
                return CommandResult::failed(error.to_string());
            }
            let result = CommandResult::ok(
                staged_state.clone(),
                Some(RollbackCommand { command: command.clone() }),
            );
            self.staged = Some((staged_state, command));
            self.executing = false;
            return result;
        }

        if let Err(error) = command.apply(&mut self.state) {
            self.executing = false;
            self.report_error(&error);
            self.events.publish(&EditorEvent::ExecutionFailed {
                description,
                error: error.to_string(),
            });
            return CommandResult::failed(error.to_string());
        }

        let rollback = RollbackCommand { command: command.clone() };
        if self.recording {
            self.record(command);
        }

        self.executing = false;
        self.events.publish(&EditorEvent::CommandExecuted {
            description,
            undo_depth: self.undo_stack.len(),
        });
        CommandResult::ok(self.state.clone(), Some(rollback))
    }

    /// Records an applied command into the pending batch or the undo stack.
    fn record(&mut self, command: FormCommand) {
        let window = self.config.merge_window_ms;

        if self.config.batching {
            let mergeable = self
                .pending
                .last()
                .or_else(|| self.undo_stack.last())
                .map(|prev| prev.can_merge_with(&command, window))
                .unwrap_or(false);

            if mergeable {
                // Each arrival resets the quiet period
                self.pending.push(command);
                self.batch_deadline = Some(Instant::now() + self.config.batch_delay);
                return;
            }
            self.flush_batch();
            self.undo_stack.push(command);
            self.trim_history();
            return;
        }

        match self.undo_stack.last_mut() {
            Some(top) if top.can_merge_with(&command, window) => {
                // can_merge_with checked, merge cannot refuse
                if let Err(error) = top.merge_from(command) {
                    warn!(error = %error, "merge refused unexpectedly");
                }
            }
            _ => self.undo_stack.push(command),
        }
        self.trim_history();
    }

    /// Folds the pending batch into history entries.
    ///
    /// Commands fold pairwise left-to-right; runs that stop being mergeable
    /// produce separate entries. The leading entry also merges into the
    /// undo-stack top when compatible.
    pub fn flush_batch(&mut self) {
        if self.pending.is_empty() {
            self.batch_deadline = None;
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        self.batch_deadline = None;
        let commands = pending.len();

        let mut folded: Vec<FormCommand> = Vec::new();
        for cmd in pending {
            match folded.last_mut() {
                Some(last) if last.can_merge_with(&cmd, self.config.merge_window_ms) => {
                    // can_merge_with checked, merge cannot refuse
                    let _ = last.merge_from(cmd);
                }
                _ => folded.push(cmd),
            }
        }

        let mut entries = 0;
        for cmd in folded {
            match self.undo_stack.last_mut() {
                Some(top) if top.can_merge_with(&cmd, self.config.merge_window_ms) => {
                    let _ = top.merge_from(cmd);
                }
                _ => {
                    self.undo_stack.push(cmd);
                    entries += 1;
                }
            }
        }
        self.trim_history();

        debug!(commands, entries, "flushed command batch");
        self.events
            .publish(&EditorEvent::BatchFlushed { commands, entries });
    }

    /// Flushes the pending batch if its quiet period has elapsed. The
    /// integration layer calls this from its tick; undo/redo flush
    /// unconditionally on their own.
    pub fn maybe_flush(&mut self) {
        if let Some(deadline) = self.batch_deadline {
            if Instant::now() >= deadline {
                self.flush_batch();
            }
        }
    }

    /// Commits the staged state in non-optimistic mode. No-op when nothing
    /// is staged.
    pub fn commit_staged(&mut self) {
        if let Some((staged_state, command)) = self.staged.take() {
            self.state = staged_state;
            if self.recording {
                self.record(command);
            }
            self.events.publish(&EditorEvent::StateCommitted);
        }
    }

    /// Discards the staged state in non-optimistic mode, leaving the
    /// committed state and history untouched.
    pub fn reject_staged(&mut self) {
        if self.staged.take().is_some() {
            debug!("staged state rejected");
        }
    }

    /// Undoes the most recent command.
    ///
    /// An empty history is an expected condition reported through the
    /// result, never an error.
    pub fn undo(&mut self) -> CommandResult {
        if self.executing {
            let error = Error::Command(formkit_core::CommandError::ReentrantDispatch {
                in_flight: "undo".to_string(),
            });
            self.report_error(&error);
            return CommandResult::failed(error.to_string());
        }
        self.commit_staged();
        self.flush_batch();

        let Some(mut command) = self.undo_stack.pop() else {
            return CommandResult::failed("Nothing to undo");
        };
        self.executing = true;

        let description = command.description();
        if let Err(error) = command.undo(&mut self.state) {
            // The command could not invert; put it back so history stays
            // consistent with the state
            self.undo_stack.push(command);
            self.executing = false;
            self.report_error(&error);
            self.events.publish(&EditorEvent::ExecutionFailed {
                description,
                error: error.to_string(),
            });
            return CommandResult::failed(error.to_string());
        }

        self.redo_stack.push(command);
        self.executing = false;
        debug!(command = %description, "undone");
        self.events.publish(&EditorEvent::CommandUndone {
            description,
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
        });
        CommandResult::ok(self.state.clone(), None)
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self) -> CommandResult {
        if self.executing {
            let error = Error::Command(formkit_core::CommandError::ReentrantDispatch {
                in_flight: "redo".to_string(),
            });
            self.report_error(&error);
            return CommandResult::failed(error.to_string());
        }
        self.commit_staged();
        self.flush_batch();

        let Some(mut command) = self.redo_stack.pop() else {
            return CommandResult::failed("Nothing to redo");
        };
        self.executing = true;

        let description = command.description();
        if let Err(error) = command.apply(&mut self.state) {
            self.redo_stack.push(command);
            self.executing = false;
            self.report_error(&error);
            self.events.publish(&EditorEvent::ExecutionFailed {
                description,
                error: error.to_string(),
            });
            return CommandResult::failed(error.to_string());
        }

        self.undo_stack.push(command);
        self.trim_history();
        self.executing = false;
        debug!(command = %description, "redone");
        self.events.publish(&EditorEvent::CommandRedone {
            description,
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
        });
        CommandResult::ok(self.state.clone(), None)
    }

    /// Clears both stacks and any pending batch.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.clear();
        self.batch_deadline = None;
        self.events.publish(&EditorEvent::HistoryCleared);
    }

    /// Drops oldest undo entries beyond `depth`.
    pub fn trim_to_depth(&mut self, depth: usize) {
        while self.undo_stack.len() > depth {
            self.undo_stack.remove(0);
        }
    }

    /// Serializes the undo stack, oldest first, for persistence.
    pub fn history_records(&self) -> Result<Vec<CommandRecord>> {
        self.undo_stack.iter().map(|c| c.to_record()).collect()
    }
}

impl std::fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("pending", &self.pending.len())
            .field("executing", &self.executing)
            .finish()
    }
}
