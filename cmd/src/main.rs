use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use clap::Parser;
use log::warn;

use ordo_skip_list::skip_list::{SkipList, SkipListBuilder};
use ordo_skip_list::Result;

const OP_INSERT: i32 = 0;
const OP_DELETE: i32 = 1;
const OP_SEARCH: i32 = 2;
const OP_UPDATE: i32 = 3;
const OP_DUMP: i32 = 4;
const OP_LOAD: i32 = 5;
const OP_EXIT: i32 = -1;

#[derive(Parser)]
#[command(name = "ordocli")]
#[command(version = "0.1.0")]
#[command(about = "An interactive driver for the ordo skip list")]
struct Cli {
    /// File read and written by the dump and load commands
    #[arg(short, long, default_value = "dump_file")]
    file: PathBuf,
    /// Highest level a node may reach
    #[arg(long, default_value_t = 32)]
    max_level: usize,
    /// Chance that a node at level i also reaches level i + 1
    #[arg(long, default_value_t = 0.25)]
    probability: f64,
    /// Seed for the level generator, drawn from system entropy when absent
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = SkipListBuilder::default();
    builder
        .set_max_level(cli.max_level)
        .set_probability(cli.probability);
    if let Some(seed) = cli.seed {
        builder.set_seed(seed);
    }
    let list: SkipList<String, String> = builder.build();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("stdin: {e}");
                break;
            }
        };
        let mut tokens = line.split_whitespace();
        let Some(op) = tokens.next() else {
            continue;
        };
        let op: i32 = match op.parse() {
            Ok(op) => op,
            Err(_) => {
                warn!("not an operation code: {op}");
                continue;
            }
        };
        if op == OP_EXIT {
            break;
        }
        if let Err(e) = run_command(&list, op, &mut tokens, &cli.file) {
            eprintln!("{}", e);
        }
        println!("size: {}", list.len());
        print!("{}", list);
    }
}

fn run_command(
    list: &SkipList<String, String>,
    op: i32,
    args: &mut SplitWhitespace,
    file: &Path,
) -> Result<()> {
    match op {
        OP_INSERT => {
            let (Some(key), Some(value)) = (args.next(), args.next()) else {
                warn!("insert needs a key and a value");
                return Ok(());
            };
            println!("{}", list.insert(key.into(), value.into()));
        }
        OP_DELETE => {
            let Some(key) = args.next() else {
                warn!("delete needs a key");
                return Ok(());
            };
            println!("{}", list.erase(&key.into()));
        }
        OP_SEARCH => {
            let Some(key) = args.next() else {
                warn!("search needs a key");
                return Ok(());
            };
            match list.search(&key.into()) {
                Some(value) => {
                    println!("true");
                    println!("{key}:{value}");
                }
                None => println!("false"),
            }
        }
        OP_UPDATE => {
            let (Some(key), Some(value)) = (args.next(), args.next()) else {
                warn!("update needs a key and a value");
                return Ok(());
            };
            println!("{}", list.update(&key.into(), value.into()));
        }
        OP_DUMP => {
            list.dump_to_path(file)?;
        }
        OP_LOAD => {
            let loaded = list.load_from_path(file)?;
            println!("loaded: {loaded}");
        }
        _ => warn!("unknown operation code: {op}"),
    }
    Ok(())
}
