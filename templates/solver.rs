//! casejam solver skeleton.
//!
//! - `cargo run --release -- A-small.in A-small.out` reads and writes files;
//!   without arguments it reads stdin and writes stdout.
//! - `solve` receives every line of one test case. Return only the answer,
//!   `Case #x: ` is added automatically.
//! - Cases with a varying number of lines: replace `lines_per_case(1)` with
//!   `with_plan(FramingPlan::builder().varying(|header| Ok(header.trim().parse()?)).build()?)`.

use casejam::Harness;

fn main() -> casejam::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let io = if args.is_empty() {
        Harness::from_streams(std::io::stdin(), std::io::stdout())
    } else {
        Harness::from_args(&args)?
    };
    io.lines_per_case(1)?.time_execution().solve(solve)?;
    Ok(())
}

fn solve(lines: &[String]) -> anyhow::Result<String> {
    // TODO: solve the test case
    Ok(lines.join(" "))
}
