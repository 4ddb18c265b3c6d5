use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use colored::Colorize;

use chilli_bowl::{trace, Kitchen, KitchenConfig, ServiceReport};

fn load_config() -> Result<KitchenConfig> {
    match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => KitchenConfig::load(&path)
            .with_context(|| format!("loading kitchen config from {}", path.display())),
        None => Ok(KitchenConfig::default()),
    }
}

fn print_report(report: &ServiceReport) {
    println!("{}", "=== Restaurant Report ===".bold());
    println!("Orders placed:    {}", report.orders_placed);
    println!("Orders fulfilled: {}", report.orders_fulfilled);
    println!("Queue capacity:   {}", report.stats.capacity);
    println!();

    for tally in &report.per_cook {
        println!(
            "  Cook #{:<3} fulfilled {} orders",
            tally.cook_id,
            tally.fulfilled.to_string().cyan()
        );
    }
    println!();

    if report.stats.is_drained() {
        println!("{}", "Every order was cooked exactly once.".green());
    } else {
        println!("{}", "Orders went missing!".red().bold());
    }
}

fn run() -> Result<()> {
    trace::init_tracing();

    let config = load_config()?;
    let kitchen = Kitchen::new(config).context("invalid kitchen config")?;

    println!("{}", "Restaurant is open!".green().bold());
    let report = kitchen.serve().context("restaurant service failed")?;
    println!("{}", "Restaurant is closed!".green().bold());
    println!();

    print_report(&report);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        process::exit(1);
    }
}
