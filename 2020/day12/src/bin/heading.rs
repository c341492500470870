use anyhow::{Context, Result};
use clap::Parser;
use ship_navigation::{HeadingCLIArgs, HeadingShip, Navigator};

fn main() -> Result<()> {
    ship_navigation::init_tracing();
    let args = HeadingCLIArgs::parse();
    let insts = ship_navigation::read_insts(&args.input_path).with_context(|| {
        format!(
            "Failed to read instructions from given input file({}).",
            args.input_path.display()
        )
    })?;

    let mut ship = HeadingShip::new();
    let start_pos = ship.pos().clone();
    ship.navigate(&insts)
        .context("Failed to navigate ship along its heading.")?;

    let cur_pos = ship.pos();
    println!("After {} instruction(s), ship moved from {} to {}, the Manhattan distance between these two locations is {}.", insts.len(), start_pos, cur_pos, cur_pos.m_dist(&start_pos));

    Ok(())
}
