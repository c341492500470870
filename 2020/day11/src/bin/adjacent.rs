use anyhow::{Context, Result};
use clap::Parser;
use seat_layout::{CLIArgs, ChgForOccupiedN, Env8Neighbors};

fn main() -> Result<()> {
    seat_layout::init_tracing();
    let args = CLIArgs::parse();
    let mut seat_map = seat_layout::read_sm(&args.input_path).with_context(|| {
        format!(
            "Failed to read map of seats layout from given input file({}).",
            args.input_path.display()
        )
    })?;

    let rule = ChgForOccupiedN::new(4);
    let round_count = seat_map
        .run_to_convergence(&Env8Neighbors, &rule, args.max_rounds)
        .context("Failed to stabilize given seats layout with adjacent seats rule.")?;

    if args.show_layout {
        println!("{}", seat_map);
    }
    println!("After {} round(s), given seats layout stabilizes, and there are {} seats have been occupied.", round_count, seat_map.count_occupied());

    Ok(())
}
