//! AtlasCol Demo Binary
//!
//! Loads generated rows into a columnar table, optionally builds a hash
//! index, removes some rows and prints what scans and probes return.

use atlascol::{ColumnType, Config, Cursor, Engine, TableDescriptor, Value};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// AtlasCol Demo
#[derive(Parser, Debug)]
#[command(name = "atlascol-demo")]
#[command(about = "Exercise the columnar table engine")]
#[command(version)]
struct Args {
    /// Number of rows to generate
    #[arg(short, long, default_value = "10")]
    rows: u32,

    /// Column to build a hash index on (A, B or C)
    #[arg(short, long)]
    index_column: Option<String>,

    /// Value to look up through the hash index
    #[arg(short, long)]
    probe: Option<String>,

    /// Remove every n-th row after loading (0 = none)
    #[arg(long, default_value = "0")]
    remove_every: u32,

    /// Run in multi-version mode
    #[arg(short, long)]
    multi_version: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlascol=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("AtlasCol Demo v{}", atlascol::VERSION);

    if let Err(e) = run(&args) {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> atlascol::Result<()> {
    let config = Config::builder().multi_version(args.multi_version).build();
    let engine = Engine::new(config);
    let session = engine.open_session();

    let handle = engine.create_table(
        TableDescriptor::new("T")
            .column("A", ColumnType::Int)
            .column("B", ColumnType::Varchar)
            .column("C", ColumnType::BigInt),
    )?;
    let mut table = handle.table.write();

    for i in 0..args.rows {
        let a = Value::Int((i % 3) as i32);
        let b = Value::Varchar((i % 2).to_string());
        let c = Value::BigInt(i64::from(i) * 10 - 5);
        table.add_row(&session, vec![a, b, c])?;
    }

    if let Some(column) = &args.index_column {
        table.add_index(&session, &format!("IDX_{}", column.to_ascii_uppercase()), column)?;
    }

    if args.remove_every > 0 {
        let mut key = 0;
        while key < u64::from(args.rows) {
            table.remove_row(&session, key)?;
            key += u64::from(args.remove_every);
        }
    }

    table.commit(&session);

    println!(
        "rows: {} (memory: {} bytes)",
        table.row_count(&session),
        table.memory_used()
    );
    for index in table.indexes() {
        println!(
            "index {} cost(A=?): {}",
            index.plan_sql(),
            index.get_cost(&session, Some(&[1u32, 0, 0][..]))
        );
    }

    let mut cursor = table.scan(&session);
    while cursor.next() {
        if let Some(row) = cursor.get() {
            let cells: Vec<String> = row.values().iter().map(ToString::to_string).collect();
            println!("{:>4}: {}", row.key(), cells.join(" | "));
        }
    }

    if let (Some(column), Some(probe)) = (&args.index_column, &args.probe) {
        match table.find_equal(&session, column, Value::Varchar(probe.clone()))? {
            Some(row) => println!("probe {}={} -> key {}", column, probe, row.key()),
            None => println!("probe {}={} -> no row", column, probe),
        }
    }

    Ok(())
}
