//! Word-list benchmark: load a dictionary, build dotted-word keys, and
//! measure memory and throughput for the trie variants against `BTreeMap`.
//!
//! Default input: /usr/share/dict/words (one word per line). A missing file
//! falls back to generated pseudo-words, so the binary runs anywhere.

#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Force jemalloc to return unused memory and read accurate allocated bytes.
fn get_allocated() -> usize {
    tikv_jemalloc_ctl::epoch::advance().unwrap();
    unsafe {
        let _ = tikv_jemalloc_ctl::raw::write(b"arena.0.purge\0", 0u64);
    }
    tikv_jemalloc_ctl::epoch::advance().unwrap();
    tikv_jemalloc_ctl::stats::allocated::read().unwrap()
}

use clap::{Parser, ValueEnum};
use patricia_rs::{TrieMap, TrieSet};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use triebench::{Generator, WordList, SYSTEM_WORDS};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Structure {
    BTreeMap,
    Trie0,
    Trie1k,
    Trie4k,
    TrieSet,
}

impl Structure {
    fn name(&self) -> &'static str {
        match self {
            Structure::BTreeMap => "BTreeMap",
            Structure::Trie0 => "Trie/0",
            Structure::Trie1k => "Trie/1K",
            Structure::Trie4k => "Trie/4K",
            Structure::TrieSet => "TrieSet",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "words_bench")]
#[command(about = "Measure trie memory/throughput over dictionary-derived keys")]
struct Args {
    /// Path to the word list (one word per line)
    #[arg(short, long, default_value = SYSTEM_WORDS)]
    path: String,

    /// Number of keys to build
    #[arg(short, long, default_value_t = 200_000)]
    count: usize,

    /// Dotted words prepended to each key (key length scales with this)
    #[arg(short, long, default_value_t = 1)]
    seq_len: usize,

    /// RNG seed for key generation and shuffling
    #[arg(long, default_value_t = 9)]
    seed: u64,

    /// Skip the lookup verification pass
    #[arg(long, default_value_t = false)]
    no_verify: bool,

    /// Structures to test
    #[arg(short = 't', long, value_enum, value_delimiter = ',', default_values_t = vec![
        Structure::BTreeMap,
        Structure::Trie0,
        Structure::Trie1k,
        Structure::Trie4k,
        Structure::TrieSet,
    ])]
    structures: Vec<Structure>,
}

struct VerifyResult {
    found: usize,
    total: usize,
    elapsed: Duration,
}

struct Stats {
    count: usize,
    raw_bytes: usize,
    total_bytes: usize,
    insert_time: Duration,
    verify: Option<VerifyResult>,
}

fn print_table_header(path: &str, count: usize, raw_bytes: usize, verify: bool) {
    println!("Input: {path}");
    println!("Built {count} keys ({:.1} MB raw)", raw_bytes as f64 / 1e6);
    println!();
    println!(
        "{:<10} {:>12} {:>10} {:>10} {:>12} {:>10} {:>6}",
        "Structure",
        "Total MB",
        "B/key",
        "Overhead",
        "Insert/s",
        "Lookup/s",
        if verify { "OK?" } else { "Check" }
    );
    println!("{}", "─".repeat(76));
}

fn print_stats(name: &str, stats: &Stats) {
    let total_mb = stats.total_bytes as f64 / 1e6;
    let (per_key, overhead) = if stats.count > 0 {
        (
            stats.total_bytes as f64 / stats.count as f64,
            (stats.total_bytes as f64 - stats.raw_bytes as f64) / stats.count as f64,
        )
    } else {
        (0.0, 0.0)
    };
    let insert_rate = if stats.insert_time.as_secs_f64() > 0.0 {
        stats.count as f64 / stats.insert_time.as_secs_f64()
    } else {
        0.0
    };
    let (lookup_rate, ok) = match &stats.verify {
        Some(v) if v.elapsed.as_secs_f64() > 0.0 => (
            v.total as f64 / v.elapsed.as_secs_f64(),
            if v.found == v.total { "✓" } else { "✗" },
        ),
        Some(_) => (0.0, "✗"),
        None => (0.0, "-"),
    };

    println!(
        "{:<10} {:>12.1} {:>10.1} {:>10.1} {:>12.0} {:>10.0} {:>6}",
        name, total_mb, per_key, overhead, insert_rate, lookup_rate, ok
    );
}

fn run_btree(keys: &[Vec<u8>], verify: bool) -> Stats {
    let raw_bytes: usize = keys.iter().map(|k| k.len()).sum();
    let before = get_allocated();

    let mut map: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    let start = Instant::now();
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i as u64);
    }
    let insert_time = start.elapsed();
    let after = get_allocated();

    let verify = verify.then(|| {
        let start = Instant::now();
        let found = keys.iter().filter(|k| map.contains_key(*k)).count();
        VerifyResult {
            found,
            total: keys.len(),
            elapsed: start.elapsed(),
        }
    });

    Stats {
        count: keys.len(),
        raw_bytes,
        total_bytes: after.saturating_sub(before),
        insert_time,
        verify,
    }
}

fn run_trie(keys: &[Vec<u8>], chunk: usize, verify: bool) -> Stats {
    let raw_bytes: usize = keys.iter().map(|k| k.len()).sum();
    let before = get_allocated();

    let mut map: TrieMap<u64> = TrieMap::with_chunk_size(chunk);
    let start = Instant::now();
    for (i, key) in keys.iter().enumerate() {
        map.insert(key, i as u64);
    }
    let insert_time = start.elapsed();
    let after = get_allocated();

    let verify = verify.then(|| {
        let start = Instant::now();
        let found = keys.iter().filter(|k| map.contains(k)).count();
        VerifyResult {
            found,
            total: keys.len(),
            elapsed: start.elapsed(),
        }
    });

    Stats {
        count: keys.len(),
        raw_bytes,
        total_bytes: after.saturating_sub(before),
        insert_time,
        verify,
    }
}

fn run_trie_set(keys: &[Vec<u8>], verify: bool) -> Stats {
    let raw_bytes: usize = keys.iter().map(|k| k.len()).sum();
    let before = get_allocated();

    let mut set: TrieSet = TrieSet::new();
    let start = Instant::now();
    for key in keys.iter() {
        set.add(key);
    }
    let insert_time = start.elapsed();
    let after = get_allocated();

    let verify = verify.then(|| {
        let start = Instant::now();
        let found = keys.iter().filter(|k| set.contains(k)).count();
        VerifyResult {
            found,
            total: keys.len(),
            elapsed: start.elapsed(),
        }
    });

    Stats {
        count: keys.len(),
        raw_bytes,
        total_bytes: after.saturating_sub(before),
        insert_time,
        verify,
    }
}

fn main() {
    let args = Args::parse();
    let verify = !args.no_verify;

    println!("Loading words from {}...", args.path);
    let mut list = WordList::load_or_generate(&args.path, 50_000, args.seed);
    println!("{} words", list.words.len());
    list.shuffle(args.seed);

    let mut generator = Generator::new(&list.words, args.seed);
    generator.seq_len = args.seq_len;
    let keys = generator.take_keys(args.count);
    let raw_bytes: usize = keys.iter().map(|k| k.len()).sum();

    // Establish a clean allocator baseline before measuring.
    let _ = get_allocated();

    print_table_header(&args.path, keys.len(), raw_bytes, verify);

    for structure in &args.structures {
        let stats = match structure {
            Structure::BTreeMap => run_btree(&keys, verify),
            Structure::Trie0 => run_trie(&keys, 0, verify),
            Structure::Trie1k => run_trie(&keys, 1024, verify),
            Structure::Trie4k => run_trie(&keys, 4096, verify),
            Structure::TrieSet => run_trie_set(&keys, verify),
        };
        print_stats(structure.name(), &stats);
    }

    println!("{}", "─".repeat(76));
    println!("Overhead = (total - raw_keys) / count; Lookup/s counts one probe per key");
}
