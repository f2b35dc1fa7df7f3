//! BinIdx CLI Client
//!
//! Command-line interface for interacting with a BinIdx server.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::process;

use binidx::protocol::{read_response, write_command, Command, Reply, Status};
use binidx::Result;
use clap::{Parser, Subcommand};

/// BinIdx CLI
#[derive(Parser, Debug)]
#[command(name = "binidx-cli")]
#[command(about = "CLI for the BinIdx record store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every index entry
    List,

    /// Look up a key
    Search {
        /// The key to look up
        key: i32,
    },

    /// Insert a new record
    Insert {
        /// The key (must parse as an integer)
        key: String,

        /// The value (at most 60 bytes are stored)
        value: String,
    },

    /// Overwrite an existing record
    Update {
        /// The key to update
        key: i32,

        /// The new value
        value: String,
    },

    /// Delete a record
    Del {
        /// The key to delete
        key: i32,
    },

    /// Replace all data with random records
    Reset {
        /// Number of records (server default if omitted)
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Measure binary-search comparisons over random keys
    Benchmark {
        /// Number of lookups (server default if omitted)
        #[arg(short, long)]
        iterations: Option<usize>,
    },

    /// Ping the server
    Ping,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List => Command::List,
            Commands::Search { key } => Command::Search { key },
            Commands::Insert { key, value } => Command::Insert { key, value },
            Commands::Update { key, value } => Command::Update { key, value },
            Commands::Del { key } => Command::Delete { key },
            Commands::Reset { count } => Command::Reset { count },
            Commands::Benchmark { iterations } => Command::Benchmark { iterations },
            Commands::Ping => Command::Ping,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args.server, args.command.into()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(server: &str, command: Command) -> Result<()> {
    let stream = TcpStream::connect(server)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    write_command(&mut writer, &command)?;
    let response = read_response(&mut reader)?;

    match response.status {
        Status::Ok => print_reply(response.reply()?),
        Status::NotFound | Status::Error => {
            eprintln!("error: {}", response.message());
            process::exit(1);
        }
    }
    Ok(())
}

fn print_reply(reply: Reply) {
    match reply {
        Reply::Index(entries) => {
            for entry in &entries {
                println!("{}\t{}\t{}", entry.key, entry.region, entry.offset);
            }
            println!("({} entries)", entries.len());
        }
        Reply::Search(result) => match result.record {
            Some(record) => println!(
                "{} = {:?} ({} @ {}, {} comparisons)",
                record.key, record.value, record.region, record.offset, result.comparisons
            ),
            None => println!("not found ({} comparisons)", result.comparisons),
        },
        Reply::Success => println!("OK"),
        Reply::Reset { count } => println!("reset with {} records", count),
        Reply::Benchmark(report) => {
            for sample in &report.results {
                println!("{}\t{}", sample.key, sample.comparisons);
            }
            println!(
                "average {:.2} comparisons ({} total over {} lookups)",
                report.average,
                report.total_comparisons,
                report.results.len()
            );
        }
        Reply::Pong => println!("PONG"),
    }
}
