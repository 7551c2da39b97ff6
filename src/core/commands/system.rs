use std::io::Write;

use super::{CommandError, CommandRegistry, ConcreteCommand};
use crate::process::ProcessRunner;

fn parse_pid(text: &str) -> Result<libc::pid_t, CommandError> {
    text.parse::<libc::pid_t>()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| CommandError::InvalidArguments("kill <pid>".to_string()))
}

pub(super) fn register(registry: &CommandRegistry) {
    let runner = ProcessRunner::new();

    let ps = runner.clone();
    registry.register(
        "ps",
        ConcreteCommand::new("List running processes", "ps", move |_, out| {
            ps.capture("ps", &["-e", "-o", "pid,comm"], out)?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    let kill = runner.clone();
    registry.register(
        "kill",
        ConcreteCommand::new("Terminate a process", "kill <pid>", move |args, out| {
            let pid = parse_pid(&args[0])?;
            kill.terminate(pid)?;
            writeln!(out, "sent SIGTERM to {}", pid)?;
            Ok(())
        })
        .arity(1, Some(1)),
    );

    let ping = runner.clone();
    registry.register(
        "ping",
        ConcreteCommand::new("Ping a host", "ping <host>", move |args, out| {
            ping.capture("ping", &["-c", "4", args[0].as_str()], out)?;
            Ok(())
        })
        .arity(1, Some(1)),
    );

    let network = runner.clone();
    registry.register(
        "network",
        ConcreteCommand::new("Show network interfaces", "network", move |_, out| {
            let candidates: [(&str, &[&str]); 2] = [("ip", &["addr"]), ("ifconfig", &[])];
            network.capture_first(&candidates, out)?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    let sysinfo = runner.clone();
    registry.register(
        "sysinfo",
        ConcreteCommand::new("Show system information", "sysinfo", move |_, out| {
            sysinfo.capture("uname", &["-a"], out)?;
            Ok(())
        })
        .arity(0, Some(0)),
    );

    registry.register(
        "calc",
        ConcreteCommand::new("Interactive calculator (bc)", "calc", move |_, out| {
            writeln!(out, "starting bc, type quit to return")?;
            out.flush()?;
            runner.interactive("bc", &["-l"])?;
            Ok(())
        })
        .arity(0, Some(0)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::tests::Harness;

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("42").unwrap(), 42);
        assert!(parse_pid("0").is_err());
        assert!(parse_pid("-5").is_err());
        assert!(parse_pid("abc").is_err());
    }

    #[test]
    fn test_kill_rejects_bad_pid() {
        let h = Harness::new();
        let (_, report) = h.run("kill nope");
        assert!(matches!(report.error, Some(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn test_kill_terminates_child() {
        let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
        let h = Harness::new();

        h.output(&format!("kill {}", child.id()));
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_system_commands_take_no_arguments() {
        let h = Harness::new();
        for line in ["ps x", "network x", "sysinfo x", "calc x"] {
            let (_, report) = h.run(line);
            assert!(matches!(report.error, Some(CommandError::InvalidArguments(_))), "{}", line);
        }
    }
}
