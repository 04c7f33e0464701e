//! mule-eda: exploratory analysis of mule accounts in a transaction shard.
//!
//! Usage:
//!   mule-eda                                  (CSV files in the current directory)
//!   mule-eda --data-dir ./data --top 20 --preview 3
//!   mule-eda --generate-sample ./sample --seed 7 --accounts 500

use anyhow::Result;
use mule_eda_core::{
    config::EdaConfig,
    pipeline::EdaPipeline,
    sample::{write_sample_dataset, SampleSpec},
};
use std::env;
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if let Some(dir) = flag_value(&args, "--generate-sample") {
        let defaults = SampleSpec::default();
        let spec = SampleSpec {
            seed: parse_arg(&args, "--seed", defaults.seed),
            accounts: parse_arg(&args, "--accounts", defaults.accounts),
            ..defaults
        };
        let summary = write_sample_dataset(dir, &spec)?;
        println!("Sample dataset written to {dir}");
        println!("  seed:         {}", spec.seed);
        println!("  customers:    {}", summary.customers);
        println!("  accounts:     {}", summary.accounts);
        println!("  labels:       {}", summary.labels);
        println!("  mules:        {}", summary.mules);
        println!("  transactions: {}", summary.transactions);
        return Ok(());
    }

    let data_dir = flag_value(&args, "--data-dir").unwrap_or(".");
    let mut config = EdaConfig::load(data_dir)?;
    config.top_n = parse_arg(&args, "--top", config.top_n);
    config.preview_rows = parse_arg(&args, "--preview", config.preview_rows);
    log::info!(
        "mule-eda: data_dir={data_dir} top_n={} preview_rows={}",
        config.top_n,
        config.preview_rows
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    EdaPipeline::new(config).run(&mut out)?;
    out.flush()?;
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
