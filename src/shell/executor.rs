use std::io::Write;

use log::debug;

use crate::error::ShellError;
use crate::highlight::Painter;

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, line: &str, out: &mut dyn Write) -> Result<(), ShellError>;
}

impl CommandHandler for super::Shell {
    /// Records `line` in history, dispatches it on this thread and reports
    /// how long it took. Command failures are printed by the dispatcher and
    /// never end the loop.
    fn execute_command(&mut self, line: &str, out: &mut dyn Write) -> Result<(), ShellError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        self.state.record_history(line);

        let report = self.dispatcher.run(line, out);
        if let Some(error) = &report.error {
            debug!("{:?} failed after {:?}: {}", line, report.elapsed, error);
        }

        let painter = Painter::new(self.state.current_theme());
        writeln!(
            out,
            "{}",
            painter.text(&format!("completed in {} ms", report.elapsed.as_millis()))
        )?;
        out.flush()?;
        Ok(())
    }
}
