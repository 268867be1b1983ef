#![no_main]
use libfuzzer_sys::fuzz_target;

const SUBCOMMANDS: [&str; 4] = ["inspect", "chunks", "config", "help"];
const FLAGS: [&str; 5] = ["-q", "-v", "--json", "--verbose", "--quiet"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    // Leading byte picks global flags and a subcommand; the remaining
    // bytes become file operands so path shapes get exercised.
    let mut args: Vec<String> = FLAGS
        .iter()
        .enumerate()
        .filter(|(i, _)| selector & (1 << i) != 0)
        .map(|(_, f)| f.to_string())
        .collect();
    args.push(SUBCOMMANDS[(selector >> 5) as usize % SUBCOMMANDS.len()].to_string());
    args.extend(
        String::from_utf8_lossy(rest)
            .split(|c: char| c.is_whitespace() || c == '\0')
            .filter(|s| !s.is_empty())
            .take(16)
            .map(|s| format!("{s}.beam")),
    );
    beamfile::cli::fuzz_try_parse_args(&args);
});
