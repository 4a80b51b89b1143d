use std::num::NonZeroUsize;

use clap::Parser;
use probing_hash::FastHasher;
use probing_hash::HashMap;
use probing_hash::KeyHasher;
use probing_hash::ReprHash;
use probing_hash::TableConfig;
use probing_hash::distribute;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    #[arg(short = 'n', long = "items", default_value_t = 500)]
    items: u64,

    #[arg(short = 't', long = "threshold", default_value_t = 0.6)]
    threshold: f64,

    #[arg(short = 'b', long = "bins", default_value_t = 16)]
    bins: usize,
}

fn fill<H: KeyHasher<u64>>(name: &str, config: TableConfig, hasher: H, items: u64) {
    let mut map = match HashMap::with_config_and_hasher(config, hasher) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("{name}: {err}");
            return;
        }
    };

    println!("=== {name} ===");
    println!("Initial capacity: {}", map.capacity());

    let mut num_failures = 0;
    for i in 0..items {
        if map.insert(i, i * i).is_err() {
            num_failures += 1;
        }
    }

    println!("Inserted {} values, capacity now {}", map.len(), map.capacity());
    println!("Final load factor: {:.2}%", map.load_factor() * 100.0);

    map.probe_histogram().print();
    map.debug_stats().print();
    println!(
        "Number of failed inserts: {} ({:.02}%)",
        num_failures,
        num_failures as f64 / items.max(1) as f64 * 100.0
    );
    println!();
}

fn main() {
    let _ = tracing_subscriber::fmt::try_init();
    let args = Args::parse();

    let config = TableConfig::default()
        .with_capacity(args.target_capacity)
        .with_load_factor_threshold(args.threshold);

    fill("ReprHash", config, ReprHash::new(), args.items);
    fill("FastHasher", config, FastHasher::default(), args.items);

    let Some(bins) = NonZeroUsize::new(args.bins) else {
        eprintln!("bins must be at least 1");
        return;
    };

    println!("=== ReprHash distribution over {bins} bins ===");
    distribute(0..args.items, bins, &ReprHash::new()).print();
    println!();
    println!("=== FastHasher distribution over {bins} bins ===");
    distribute(0..args.items, bins, &FastHasher::default()).print();
}
