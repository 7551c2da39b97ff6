use std::io::Write;

use super::{Command, CommandError};

type ExecFn = dyn Fn(&[String], &mut dyn Write) -> Result<(), CommandError> + Send + Sync;
type ValidateFn = dyn Fn(&[String]) -> bool + Send + Sync;
type CompleteFn = dyn Fn(&str) -> Vec<String> + Send + Sync;

/// A command assembled from closures plus its help metadata.
pub struct ConcreteCommand {
    exec: Box<ExecFn>,
    validator: Box<ValidateFn>,
    completer: Option<Box<CompleteFn>>,
    help: String,
    usage: String,
}

impl ConcreteCommand {
    pub fn new<F>(help: impl Into<String>, usage: impl Into<String>, exec: F) -> Self
    where
        F: Fn(&[String], &mut dyn Write) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Self {
            exec: Box::new(exec),
            validator: Box::new(|_| true),
            completer: None,
            help: help.into(),
            usage: usage.into(),
        }
    }

    /// Accepts between `min` and `max` (inclusive, `None` = unbounded) arguments.
    pub fn arity(self, min: usize, max: Option<usize>) -> Self {
        self.with_validator(move |args| args.len() >= min && max.map_or(true, |max| args.len() <= max))
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_completions<C>(mut self, completer: C) -> Self
    where
        C: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.completer = Some(Box::new(completer));
        self
    }
}

impl Command for ConcreteCommand {
    fn help(&self) -> &str {
        &self.help
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn validate(&self, args: &[String]) -> bool {
        (self.validator)(args)
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        (self.exec)(args, out)
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        self.completer
            .as_ref()
            .map(|complete| complete(prefix))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_executes_closure() {
        let cmd = ConcreteCommand::new("say", "say <text>", |args, out| {
            writeln!(out, "{}", args.join("+"))?;
            Ok(())
        });

        let mut out = Vec::new();
        cmd.execute(&args(&["a", "b"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a+b\n");
        assert_eq!(cmd.help(), "say");
        assert_eq!(cmd.usage(), "say <text>");
    }

    #[test]
    fn test_arity() {
        let cmd = ConcreteCommand::new("", "", |_, _| Ok(())).arity(1, Some(2));
        assert!(!cmd.validate(&args(&[])));
        assert!(cmd.validate(&args(&["a"])));
        assert!(cmd.validate(&args(&["a", "b"])));
        assert!(!cmd.validate(&args(&["a", "b", "c"])));

        let open = ConcreteCommand::new("", "", |_, _| Ok(())).arity(1, None);
        assert!(open.validate(&args(&["a", "b", "c", "d"])));
    }

    #[test]
    fn test_default_accepts_anything_and_completes_nothing() {
        let cmd = ConcreteCommand::new("", "", |_, _| Ok(()));
        assert!(cmd.validate(&args(&["x"; 10])));
        assert!(cmd.completions("x").is_empty());
    }

    #[test]
    fn test_with_completions() {
        let cmd = ConcreteCommand::new("", "", |_, _| Ok(()))
            .with_completions(|prefix| vec![format!("{}1", prefix)]);
        assert_eq!(cmd.completions("ab"), vec!["ab1"]);
    }
}
