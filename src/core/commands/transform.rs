use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Write;

use super::{CommandError, CommandRegistry, ConcreteCommand};
use crate::codec::{base64, rle_decode, rle_encode, xor_transform, DEFAULT_KEY};

/// Reads `input`, applies `transform` and writes the result to `output`.
fn transform_file(
    input: &str,
    output: &str,
    transform: impl Fn(&[u8]) -> Vec<u8>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let data = fs::read(input).map_err(CommandError::io_failure(input))?;
    let result = transform(&data);
    fs::write(output, &result).map_err(CommandError::io_failure(output))?;
    writeln!(out, "{} ({} bytes) -> {} ({} bytes)", input, data.len(), output, result.len())?;
    Ok(())
}

fn file_transform(
    registry: &CommandRegistry,
    name: &str,
    help: &str,
    transform: fn(&[u8]) -> Vec<u8>,
) {
    registry.register(
        name,
        ConcreteCommand::new(help, format!("{} <input> <output>", name), move |args, out| {
            transform_file(&args[0], &args[1], transform, out)
        })
        .arity(2, Some(2))
        .with_completions(super::file::complete_path),
    );
}

fn xor_default(data: &[u8]) -> Vec<u8> {
    xor_transform(data, DEFAULT_KEY)
}

pub(super) fn register(registry: &CommandRegistry) {
    file_transform(registry, "encrypt", "XOR-scramble a file", xor_default);
    file_transform(registry, "decrypt", "Undo encrypt", xor_default);
    file_transform(registry, "compress", "Run-length encode a file", rle_encode);
    file_transform(registry, "decompress", "Undo compress", rle_decode);

    registry.register(
        "base64",
        ConcreteCommand::new(
            "Base64 encode or decode text",
            "base64 <encode|decode> <text...>",
            |args, out| {
                let text = args[1..].join(" ");
                match args[0].as_str() {
                    "encode" => writeln!(out, "{}", base64::encode(text.as_bytes()))?,
                    "decode" => {
                        let decoded = base64::decode_to_string(&text)
                            .map_err(|e| CommandError::Execution(e.to_string()))?;
                        writeln!(out, "{}", decoded)?;
                    }
                    _ => {
                        return Err(CommandError::InvalidArguments(
                            "base64 <encode|decode> <text...>".to_string(),
                        ))
                    }
                }
                Ok(())
            },
        )
        .arity(2, None)
        .with_completions(|prefix| {
            ["encode", "decode"]
                .iter()
                .filter(|mode| mode.starts_with(prefix))
                .map(|mode| mode.to_string())
                .collect()
        }),
    );

    registry.register(
        "hash",
        ConcreteCommand::new("64-bit hash of the text", "hash <text...>", |args, out| {
            let mut hasher = DefaultHasher::new();
            args.join(" ").hash(&mut hasher);
            writeln!(out, "{:016x}", hasher.finish())?;
            Ok(())
        })
        .arity(1, None),
    );
}
