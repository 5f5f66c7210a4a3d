//! Filter a stream of newline-delimited JSON records

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::{EvalContext, EvalOptions, Evaluator, FieldType, Parser};

use super::CliError;

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Expression every record is tested against
    pub expression: String,
    /// Fields to treat as numeric in every record
    pub numeric: Vec<String>,
    /// Fail on numeric fields holding non-numeric text
    pub strict_numbers: bool,
}

/// Counts reported once the input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub records: usize,
    pub matched: usize,
    pub skipped: usize,
}

/// Writes every input line whose record satisfies the expression.
///
/// The expression is parsed once up front; a syntax error aborts before any
/// input is read. Lines that are not UTF-8 or not JSON objects, and records
/// that fail to evaluate, are logged and skipped.
pub fn run_filter<R: BufRead, W: Write>(
    options: &FilterOptions,
    input: R,
    mut output: W,
) -> Result<FilterStats, CliError> {
    let expr = Parser::from_source(&options.expression).parse()?;
    let evaluator = Evaluator::with_options(EvalOptions {
        strict_numbers: options.strict_numbers,
    });
    let mut stats = FilterStats::default();

    for (index, bytes) in input.split(b'\n').enumerate() {
        let mut bytes = bytes?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let line_no = index + 1;

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping record");
                stats.records += 1;
                stats.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        stats.records += 1;

        let mut ctx = match serde_json::from_str::<serde_json::Value>(&line)
            .map_err(CliError::from)
            .and_then(|v| EvalContext::from_json(&v).map_err(CliError::from))
        {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping record");
                stats.skipped += 1;
                continue;
            }
        };
        ctx.declare_all(options.numeric.iter().cloned(), FieldType::Numeric);

        match evaluator.evaluate(&expr, &ctx) {
            Ok(result) if result.is_truthy() => {
                writeln!(output, "{}", line)?;
                stats.matched += 1;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping record");
                stats.skipped += 1;
            }
        }
    }

    info!(
        records = stats.records,
        matched = stats.matched,
        skipped = stats.skipped,
        "filter finished"
    );
    Ok(stats)
}
