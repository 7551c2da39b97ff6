use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use log::{info, warn};

mod executor;

use crate::{
    core::{
        config::Config,
        dispatch::{Dispatcher, SharedOutput},
        state::ShellState,
    },
    error::ShellError,
    highlight::Painter,
    input::{
        terminal::{is_tty, ByteKeys, RawMode, TerminalWidth},
        EditorContext, LineEditor, ShellCompleter, Signal,
    },
    runtime::{TaskScheduler, ThreadPool},
};

use executor::CommandHandler;

pub const PROMPT: &str = "aether > ";
const EXIT: &str = "exit";
const STDIN_FD: i32 = libc::STDIN_FILENO;

/// Installs the SIGINT handler. While the line editor is active Ctrl-C is
/// read as a key instead, so this only fires during a running command.
pub fn install_interrupt_hint() -> Result<(), ShellError> {
    ctrlc::set_handler(|| {
        println!("\nUse 'exit' to leave the shell");
    })?;
    Ok(())
}

pub struct Shell {
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) state: ShellState,
    scheduler: Arc<TaskScheduler>,
    pool: Arc<ThreadPool>,
    editor: LineEditor,
}

impl Shell {
    pub fn new(config: Config) -> Result<Self, ShellError> {
        let pool_size = config.pool_size;
        let state = ShellState::load(config);

        let scheduler = Arc::new(TaskScheduler::start().map_err(ShellError::Thread)?);
        let pool = Arc::new(ThreadPool::new(pool_size).map_err(ShellError::Thread)?);
        let output: SharedOutput = Arc::new(Mutex::new(io::stdout()));
        let dispatcher = Dispatcher::new(state.clone(), Arc::clone(&scheduler), Arc::clone(&pool), output);

        Ok(Shell {
            dispatcher,
            state,
            scheduler,
            pool,
            editor: LineEditor::new(PROMPT),
        })
    }

    /// Runs until `exit` or end of input, then shuts the workers down.
    pub fn run(&mut self) -> Result<(), ShellError> {
        // Unlocked handles: background workers and `edit` lock them per call.
        let mut stdout = io::stdout();
        if is_tty(STDIN_FD) {
            println!("Welcome to Aether. Type 'help' to list commands, 'exit' to leave.");
            self.run_interactive(&mut stdout)?;
        } else {
            self.run_piped(&mut stdout)?;
        }
        self.shutdown();
        Ok(())
    }

    /// Handles one submitted line; `false` once the shell should stop.
    fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, ShellError> {
        if line.trim() == EXIT {
            return Ok(false);
        }
        self.execute_command(line, out)?;
        Ok(true)
    }

    fn run_piped(&mut self, out: &mut dyn Write) -> Result<(), ShellError> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            if stdin.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if !self.handle_line(line.trim_end_matches(['\r', '\n']), out)? {
                return Ok(());
            }
        }
    }

    fn run_interactive(&mut self, out: &mut dyn Write) -> Result<(), ShellError> {
        let completer = ShellCompleter::new(Arc::clone(&self.dispatcher));
        let mut width = TerminalWidth::new(libc::STDOUT_FILENO);

        loop {
            let prompt = Painter::new(self.state.current_theme()).prompt(PROMPT);
            self.editor.set_prompt(prompt);
            let history = self.state.history_snapshot();
            let ctx = EditorContext {
                history: &history,
                completer: &completer,
                width: width.get(),
            };

            let signal = {
                let _raw = RawMode::enable(STDIN_FD)?;
                let stdin = io::stdin();
                let mut keys = ByteKeys::new(stdin.lock());
                self.editor.read_line(&mut keys, &ctx, out)?
            };

            match signal {
                Signal::Line(line) => {
                    if !self.handle_line(&line, out)? {
                        break;
                    }
                }
                Signal::Interrupted => continue,
                Signal::Eof => break,
            }
        }
        Ok(())
    }

    /// Runs one command per input line, without a prompt.
    pub fn run_lines(&mut self, input: impl BufRead, out: &mut dyn Write) -> Result<(), ShellError> {
        for line in input.lines() {
            if !self.handle_line(&line?, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Saves aliases and stops the background workers. The scheduler drops
    /// whatever is still queued; the pool finishes its queue first.
    pub fn shutdown(&self) {
        if let Err(e) = self.state.persist_aliases() {
            warn!("aliases not saved: {}", e);
        }
        self.scheduler.shutdown();
        self.pool.shutdown();
        info!("shell stopped");
    }
}
