//! Custom cargo commands for the simjoin crate.
//!
//! Usage:
//!   cargo xtask test      - Run the test suite across feature combinations
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask bench     - Run benchmarks
//!   cargo xtask gen-data  - Generate synthetic join tables under target/datasets/

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        Some("gen-data") => gen_data()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  test      Run all tests with default features, then without default features
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
  gen-data  Generate synthetic join tables for integration tests and manual runs
"#
    );
}

/// Run the full test matrix: parallel on (default) and off.
fn test() -> Result<()> {
    println!("[1/2] cargo test (default features)...");
    run_cargo(&["test", "--quiet"])?;

    println!("[2/2] cargo test (no default features)...");
    run_cargo(&["test", "--quiet", "--no-default-features"])?;

    println!("\n✓ Test matrix passed");
    Ok(())
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

/// Generate two deterministic synthetic tables under target/datasets/.
///
/// The left table holds clean product names; the right table holds the same
/// names with injected single-character typos plus some unrelated rows, so an
/// edit-distance join at threshold 1-2 has known matches. Tests that consume
/// these files skip themselves when the directory is absent.
fn gen_data() -> Result<()> {
    let dir = project_root()?.join("target/datasets");
    fs::create_dir_all(&dir).context("Failed to create target/datasets")?;

    let mut rng = XorShift::new(0x5eed_cafe);

    let adjectives = [
        "red", "blue", "green", "small", "large", "wooden", "steel", "vintage", "compact",
        "folding",
    ];
    let nouns = [
        "table", "lamp", "chair", "desk", "shelf", "cabinet", "stool", "bench", "mirror", "clock",
    ];

    let mut left_rows = String::new();
    let mut right_rows = String::new();
    let mut right_id = 0usize;

    for i in 0..500 {
        let name = format!(
            "{} {}",
            adjectives[rng.below(adjectives.len())],
            nouns[rng.below(nouns.len())]
        );
        push_row(&mut left_rows, i, &name);

        // Roughly half the right rows are typo'd copies, the rest are fresh draws.
        if rng.below(2) == 0 {
            push_row(&mut right_rows, right_id, &inject_typo(&name, &mut rng));
            right_id += 1;
        }
        if rng.below(3) == 0 {
            let other = format!(
                "{} {}",
                adjectives[rng.below(adjectives.len())],
                nouns[rng.below(nouns.len())]
            );
            push_row(&mut right_rows, right_id, &other);
            right_id += 1;
        }
    }

    let left = format!(
        "{{\"attrs\":[\"id\",\"name\"],\"rows\":[{}]}}\n",
        left_rows.trim_end_matches(',')
    );
    let right = format!(
        "{{\"attrs\":[\"id\",\"name\"],\"rows\":[{}]}}\n",
        right_rows.trim_end_matches(',')
    );

    let left_path = dir.join("products_left.json");
    let right_path = dir.join("products_right.json");
    fs::write(&left_path, left).context("Failed to write left table")?;
    fs::write(&right_path, right).context("Failed to write right table")?;

    println!("✓ Wrote {}", left_path.display());
    println!("✓ Wrote {}", right_path.display());
    println!("  ({} left rows, {} right rows)", 500, right_id);
    Ok(())
}

fn push_row(buf: &mut String, id: usize, name: &str) {
    buf.push_str(&format!("[\"{}\",\"{}\"],", id, name));
}

/// Replace one character of `name` with a letter drawn from the generator.
fn inject_typo(name: &str, rng: &mut XorShift) -> String {
    let mut chars: Vec<char> = name.chars().collect();
    if chars.is_empty() {
        return name.to_string();
    }
    let pos = rng.below(chars.len());
    let replacement = (b'a' + rng.below(26) as u8) as char;
    chars[pos] = replacement;
    chars.into_iter().collect()
}

// ============================================================================
// Helper functions
// ============================================================================

/// Minimal deterministic generator so dataset contents are stable across runs.
struct XorShift {
    state: u64,
}

impl XorShift {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound.max(1) as u64) as usize
    }
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::current_dir().unwrap());

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
