use evolution::data::parse_line;
use evolution::Genome;

use std::io::{self, BufRead, Write};

/// Runs an interactive session in which every line read from
/// `input` is evaluated by `genome`, until an empty line or
/// the end of input.
///
/// Lines that do not parse, or that hold the wrong number
/// of values, are reported and the session continues.
pub fn run_session<G, R, W>(genome: &G, mut input: R, mut output: W) -> io::Result<()>
where
    G: Genome,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "\nEnter input values: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.is_empty() {
            break;
        }

        let outputs = parse_line(line)
            .map_err(|e| e.to_string())
            .and_then(|values| genome.evaluate(&values).map_err(|e| e.to_string()));
        match outputs {
            Ok(values) => writeln!(output, "Output: {}", join(&values))?,
            Err(e) => writeln!(output, "Error: {}", e)?,
        }
    }
    Ok(())
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
