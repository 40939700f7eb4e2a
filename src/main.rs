use clap::Parser;
use std::fs;
use std::path::Path;
use std::time::Instant;

use simjoin::{
    check_prefix_index, edit_distance_join, exact_join, load_index_file, save_index_file, CompOp,
    IndexFile, JoinOutput, JoinParams, PrefixIndex, QgramTokenizer, Table, TokenId, TokenOrdering,
    Tokenizer, STATE_VERSION,
};

mod cli;
use cli::display;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::JoinEd {
            ltable,
            rtable,
            l_key,
            r_key,
            l_join,
            r_join,
            threshold,
            comp_op,
            qval,
            l_out,
            r_out,
            l_prefix,
            r_prefix,
            allow_missing,
            no_sim_score,
            jobs,
            quiet,
            output,
        } => {
            let params = JoinParams {
                l_key_attr: l_key,
                r_key_attr: r_key,
                l_join_attr: l_join,
                r_join_attr: r_join,
                l_out_attrs: l_out,
                r_out_attrs: r_out,
                l_out_prefix: l_prefix,
                r_out_prefix: r_prefix,
                allow_missing,
                out_sim_score: !no_sim_score,
                n_jobs: jobs,
                show_progress: !quiet,
            };
            run_join_ed(
                &ltable,
                &rtable,
                threshold,
                &comp_op,
                qval,
                params,
                output.as_deref(),
            )
        }
        Commands::JoinExact {
            ltable,
            rtable,
            l_key,
            r_key,
            l_join,
            r_join,
            l_out,
            r_out,
            l_prefix,
            r_prefix,
            allow_missing,
            jobs,
            quiet,
            output,
        } => {
            let params = JoinParams {
                l_key_attr: l_key,
                r_key_attr: r_key,
                l_join_attr: l_join,
                r_join_attr: r_join,
                l_out_attrs: l_out,
                r_out_attrs: r_out,
                l_out_prefix: l_prefix,
                r_out_prefix: r_prefix,
                allow_missing,
                out_sim_score: false,
                n_jobs: jobs,
                show_progress: !quiet,
            };
            run_join_exact(&ltable, &rtable, params, output.as_deref())
        }
        Commands::Index {
            input,
            attr,
            qval,
            threshold,
            output,
        } => run_index(&input, &attr, qval, threshold, &output),
        Commands::Inspect { file } => run_inspect(&file),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_join_ed(
    ltable: &str,
    rtable: &str,
    threshold: f64,
    comp_op: &str,
    qval: usize,
    params: JoinParams,
    output: Option<&str>,
) -> Result<(), String> {
    let comp_op = CompOp::parse(comp_op)?;
    let left = load_table(ltable)?;
    let right = load_table(rtable)?;
    let tokenizer = QgramTokenizer::new(qval);

    let start = Instant::now();
    let result = edit_distance_join(&left, &right, threshold, comp_op, &tokenizer, &params)?;
    let elapsed = start.elapsed();

    write_output(&result, output)?;

    if params.show_progress {
        eprintln!();
        eprintln!("✅ Join complete");
        eprintln!(
            "   {} × {} rows │ {} pairs │ {:.2}s",
            left.len(),
            right.len(),
            result.len(),
            elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn run_join_exact(
    ltable: &str,
    rtable: &str,
    params: JoinParams,
    output: Option<&str>,
) -> Result<(), String> {
    let left = load_table(ltable)?;
    let right = load_table(rtable)?;

    let start = Instant::now();
    let result = exact_join(&left, &right, &params)?;
    let elapsed = start.elapsed();

    write_output(&result, output)?;

    if params.show_progress {
        eprintln!();
        eprintln!("✅ Join complete");
        eprintln!(
            "   {} × {} rows │ {} pairs │ {:.2}s",
            left.len(),
            right.len(),
            result.len(),
            elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn run_index(
    input: &str,
    attr: &str,
    qval: usize,
    threshold: f64,
    output: &str,
) -> Result<(), String> {
    let table = load_table(input)?;
    let col = table
        .attr_index(attr)
        .map_err(|e| format!("{}: {}", input, e))?;

    // Missing cells tokenize to nothing so record ids stay equal to row ids.
    let tokenizer = QgramTokenizer::new(qval);
    let token_lists: Vec<Vec<String>> = (0..table.len())
        .map(|row| {
            table
                .cell(row, col)
                .map(|value| tokenizer.tokenize(value))
                .unwrap_or_default()
        })
        .collect();

    let ordering = TokenOrdering::for_tables(&[&token_lists]);
    let sequences: Vec<Vec<TokenId>> = token_lists.iter().map(|t| ordering.order(t)).collect();

    let mut index = PrefixIndex::new();
    index.build(&sequences, qval, threshold);

    let file = IndexFile::from_index(&index, qval, threshold);
    save_index_file(Path::new(output), &file)?;

    eprintln!();
    eprintln!("✅ Index written to {}", output);
    eprintln!(
        "   {} records │ {} distinct tokens │ qval {} │ threshold {}",
        table.len(),
        file.num_tokens(),
        qval,
        threshold
    );
    Ok(())
}

fn run_inspect(path: &str) -> Result<(), String> {
    let file = load_index_file(Path::new(path))?;
    let disk_size = fs::metadata(path)
        .map(|m| m.len() as usize)
        .map_err(|e| format!("Failed to stat {}: {}", path, e))?;

    println!();
    display::double_header();
    display::title("simjoin prefix index");
    display::double_footer();
    println!();

    display::section_top("FILE");
    display::row(&format!("  Path:       {}", path));
    display::row(&format!("  Size:       {}", display::format_size(disk_size)));
    display::row(&format!(
        "  Version:    {} (current: {})",
        file.version, STATE_VERSION
    ));
    // load_index_file already recomputed and compared the checksum.
    display::row(&format!(
        "  Checksum:   {:#010x} {}",
        file.checksum,
        display::themed(display::GREEN, &[], "✓ valid")
    ));
    display::section_bot();
    println!();

    display::section_top("RECORDS");
    display::row(&format!(
        "  Records:    {}",
        display::format_count(file.num_records())
    ));
    display::row(&format!(
        "  Tokens:     {}",
        display::format_count(file.num_tokens())
    ));
    display::row(&format!("  Qval:       {}", file.qval));
    display::row(&format!("  Threshold:  {}", file.threshold));
    if !file.sizes.is_empty() {
        let min = file.sizes.iter().min().copied().unwrap_or(0);
        let max = file.sizes.iter().max().copied().unwrap_or(0);
        let avg = file.sizes.iter().sum::<usize>() as f64 / file.sizes.len() as f64;
        display::row(&format!(
            "  Sizes:      min {} │ avg {:.1} │ max {}",
            min, avg, max
        ));
    }

    display::section_mid("HEAVIEST POSTINGS");
    let mut heaviest: Vec<(TokenId, usize)> = file
        .postings
        .iter()
        .map(|(token, list)| (*token, list.len()))
        .collect();
    heaviest.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    heaviest.truncate(10);

    if heaviest.is_empty() {
        display::row("  (no postings)");
    } else {
        let top = heaviest[0].1;
        for (token, len) in &heaviest {
            display::row(&format!(
                "  {} │{}│ {}",
                display::pad_left(&format!("#{}", token), 10),
                display::bar(*len, top, 30),
                display::format_count(*len)
            ));
        }
    }

    display::section_mid("INTEGRITY");
    let index = file.into_index();
    let verdict = match check_prefix_index(&index) {
        Ok(()) => display::themed(display::GREEN, &[], "✓ postings well formed"),
        Err(e) => display::themed(display::RED, &[display::BOLD], &format!("✗ {}", e)),
    };
    display::row(&format!("  {}", verdict));
    display::section_bot();
    println!();

    Ok(())
}

fn load_table(path: &str) -> Result<Table, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid table in {}: {}", path, e))
}

fn write_output(result: &JoinOutput, path: Option<&str>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;
    match path {
        Some(p) => fs::write(p, json).map_err(|e| format!("Failed to write {}: {}", p, e)),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
