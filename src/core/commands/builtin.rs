use std::io::Write;
use std::thread;
use std::time::Duration;

use rand::Rng;

use super::{CommandError, CommandRegistry, ConcreteCommand};

/// Applies `op` to two operands.
pub fn evaluate(a: f64, op: &str, b: f64) -> Result<f64, CommandError> {
    match op {
        "+" => Ok(a + b),
        "-" => Ok(a - b),
        "*" | "x" => Ok(a * b),
        "/" if b == 0.0 => Err(CommandError::DivisionByZero),
        "/" => Ok(a / b),
        _ => Err(CommandError::InvalidArguments("math <a> <op> <b>".to_string())),
    }
}

fn parse_operand(text: &str) -> Result<f64, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidArguments("math <a> <op> <b>".to_string()))
}

pub(super) fn register(registry: &CommandRegistry) {
    registry.register(
        "echo",
        ConcreteCommand::new("Print the arguments", "echo <text...>", |args, out| {
            writeln!(out, "{}", args.join(" "))?;
            Ok(())
        }),
    );

    registry.register(
        "cls",
        ConcreteCommand::new("Clear the screen", "cls", |_, out| {
            write!(out, "\x1b[2J\x1b[H")?;
            out.flush()?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    registry.register(
        "time",
        ConcreteCommand::new("Show the local time", "time", |_, out| {
            let now = chrono::Local::now();
            writeln!(out, "{}", now.format("%Y-%m-%d %H:%M:%S"))?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    registry.register(
        "math",
        ConcreteCommand::new("Basic arithmetic", "math <a> <op> <b>", |args, out| {
            let a = parse_operand(&args[0])?;
            let b = parse_operand(&args[2])?;
            writeln!(out, "{}", evaluate(a, &args[1], b)?)?;
            Ok(())
        })
        .arity(3, Some(3))
        .with_completions(|prefix| {
            ["+", "-", "*", "/"]
                .iter()
                .filter(|op| op.starts_with(prefix))
                .map(|op| op.to_string())
                .collect()
        }),
    );

    registry.register(
        "sort",
        ConcreteCommand::new("Sort the arguments", "sort <items...>", |args, out| {
            let mut items = args.to_vec();
            items.sort();
            writeln!(out, "{}", items.join(" "))?;
            Ok(())
        })
        .arity(1, None),
    );

    registry.register(
        "random",
        ConcreteCommand::new("Random number between 1 and 100", "random", |_, out| {
            let n: u32 = rand::thread_rng().gen_range(1..=100);
            writeln!(out, "{}", n)?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    registry.register(
        "sleep",
        ConcreteCommand::new("Pause for a number of seconds", "sleep <seconds>", |args, _| {
            let delay = args[0]
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| CommandError::InvalidArguments("sleep <seconds>".to_string()))?;
            thread::sleep(delay);
            Ok(())
        })
        .arity(1, Some(1)),
    );

    registry.register(
        "weather",
        ConcreteCommand::new("Weather report (not available)", "weather <city>", |args, out| {
            writeln!(out, "weather for {}: not implemented in this build", args.join(" "))?;
            Ok(())
        })
        .arity(1, None),
    );
}
