use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use smachine::{SMachine, SMachineExecResult, Tracer};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod trace;

#[derive(Parser, Debug)]
#[command(name = "scli")]
#[command(about = "Runs a 16-bit word bytecode program image", long_about = None)]
struct Args {
    /// Path to the program image
    rom: PathBuf,

    /// Print every executed instruction with the registers and stack
    #[arg(short, long)]
    debug: bool,

    /// Log level for diagnostics written to stderr
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(args.log_level)
        .init()
        .map_err(|e| anyhow::anyhow!("unable to install logger: {}", e))?;

    let mut machine = SMachine::new();
    load_rom(&mut machine, &args.rom)?;

    let mut tracer = trace::StderrTracer::new();
    let tracer: Option<&mut dyn Tracer> = if args.debug { Some(&mut tracer) } else { None };

    let stdin = io::stdin();
    drive(&mut machine, stdin.lock(), tracer)
}

fn load_rom<W: Write>(machine: &mut SMachine<W>, rom: &Path) -> Result<()> {
    machine
        .load(rom)
        .with_context(|| format!("unable to load rom {}", rom.display()))
}

/// Runs the machine to the end, feeding it a line from `input` whenever it
/// waits. A recorded machine error becomes the returned error.
fn drive<W: Write, R: BufRead>(
    machine: &mut SMachine<W>,
    mut input: R,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<()> {
    loop {
        let result = match tracer {
            Some(ref mut t) => machine.exec_traced(&mut **t),
            None => machine.exec(),
        };

        match result {
            SMachineExecResult::NeedInput => {
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    bail!("input closed while the program was waiting for it");
                }

                machine.send_input(&line);
            },
            _ => break,
        }
    }

    if let Some(e) = machine.error() {
        return Err(e.clone().into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{drive, load_rom};
    use smachine::{LoadError, SMachine, VmError};
    use std::io::Cursor;
    use std::path::Path;

    const R0: u16 = 32768;

    fn machine(words: &[u16]) -> SMachine<Vec<u8>> {
        let mut m = SMachine::with_output(Vec::new());
        let image = words.iter().flat_map(|w| w.to_le_bytes().to_vec()).collect();
        m.load_image(image).unwrap();
        m
    }

    #[test]
    fn echoes_a_line_of_input() {
        let mut m = machine(&[20, R0, 19, R0, 20, R0, 19, R0, 0]);

        drive(&mut m, Cursor::new("ok\n"), None).unwrap();
        assert!(m.halted());
        assert_eq!(m.output(), &b"ok".to_vec());
    }

    #[test]
    fn end_of_input_while_waiting_is_an_error() {
        let mut m = machine(&[20, R0, 0]);

        let err = drive(&mut m, Cursor::new(""), None).unwrap_err();
        assert!(err.to_string().contains("input closed"));
        assert!(!m.halted());
    }

    #[test]
    fn machine_errors_fail_the_run() {
        let mut m = machine(&[19, 65, 22]);

        let err = drive(&mut m, Cursor::new(""), None).unwrap_err();
        assert_eq!(err.downcast_ref::<VmError>(), Some(&VmError::InvalidOpcode(22)));
        assert_eq!(m.output(), &b"A".to_vec());
    }

    #[test]
    fn missing_rom_is_a_load_error() {
        let mut m = SMachine::with_output(Vec::<u8>::new());

        let err = load_rom(&mut m, Path::new("/nonexistent/challenge.bin")).unwrap_err();
        assert!(err.to_string().contains("unable to load rom"));
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Io(_))));
    }
}
