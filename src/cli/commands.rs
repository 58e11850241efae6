//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::automaton::KeywordTree;
use crate::dot::DotRenderer;
use crate::serialization::{
    AutomatonSerializer, BincodeSerializer, GzipSerializer, JsonSerializer,
};

use super::args::{Commands, SerializationFormat, TreeSource};
use super::detect::{detect_format, format_from_extension};

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            keywords,
            output,
            format,
            gzip,
            case_insensitive,
            no_shortcuts,
            unfinalized,
        } => cmd_build(
            &keywords,
            &output,
            format,
            gzip,
            case_insensitive,
            !no_shortcuts,
            !unfinalized,
        ),
        Commands::Search {
            text,
            source,
            all,
            timings,
        } => cmd_search(text.as_deref(), &source, all, timings),
        Commands::Dot {
            source,
            failure_links,
            shortcuts,
            output,
        } => cmd_dot(&source, failure_links, shortcuts, output),
        Commands::Info { source } => cmd_info(&source),
        Commands::Bench {
            keywords,
            text,
            iterations,
            case_insensitive,
        } => cmd_bench(&keywords, &text, iterations, case_insensitive),
    }
}

/// Read keywords, one per line, skipping blank lines.
///
/// Trailing line breaks (`\n` or `\r\n`) are removed; other whitespace is
/// part of the keyword.
pub fn read_keywords(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open keyword file {}", path.display()))?;
    let mut keywords = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let keyword = line.strip_suffix('\r').unwrap_or(&line);
        if !keyword.trim().is_empty() {
            keywords.push(keyword.to_string());
        }
    }
    Ok(keywords)
}

/// Read a whole text from a file, or from stdin for `None` or `-`.
pub fn read_text(path: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(path) if path != Path::new("-") => {
            text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read text file {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
        }
    }
    Ok(text)
}

/// Write `tree` to `path` in the given format.
pub fn save_tree(tree: &KeywordTree, path: &Path, format: SerializationFormat, gzip: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    match (format, gzip) {
        (SerializationFormat::Bincode, false) => BincodeSerializer::serialize(tree, writer),
        (SerializationFormat::Json, false) => JsonSerializer::serialize(tree, writer),
        (SerializationFormat::Bincode, true) => {
            GzipSerializer::<BincodeSerializer>::serialize(tree, writer)
        }
        (SerializationFormat::Json, true) => GzipSerializer::<JsonSerializer>::serialize(tree, writer),
    }
    .with_context(|| format!("Failed to write automaton to {}", path.display()))
}

/// Read an automaton file, detecting its format unless `format` is given.
pub fn load_tree(path: &Path, format: Option<SerializationFormat>) -> Result<KeywordTree> {
    let detection = detect_format(path, format)?;
    log::debug!(
        "loading {} as {}{} ({})",
        path.display(),
        detection.format,
        if detection.gzip { "+gzip" } else { "" },
        detection.method
    );

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    match (detection.format, detection.gzip) {
        (SerializationFormat::Bincode, false) => BincodeSerializer::deserialize(reader),
        (SerializationFormat::Json, false) => JsonSerializer::deserialize(reader),
        (SerializationFormat::Bincode, true) => GzipSerializer::<BincodeSerializer>::deserialize(reader),
        (SerializationFormat::Json, true) => GzipSerializer::<JsonSerializer>::deserialize(reader),
    }
    .with_context(|| format!("Failed to load automaton from {}", path.display()))
}

/// Build a finalized tree from a keyword file, or load an automaton file.
pub fn resolve_tree(source: &TreeSource) -> Result<KeywordTree> {
    match (&source.keywords, &source.automaton) {
        (Some(path), _) => {
            let keywords = read_keywords(path)?;
            let tree = KeywordTree::builder()
                .case_insensitive(source.case_insensitive)
                .keywords(keywords)
                .build_finalized();
            Ok(tree)
        }
        (None, Some(path)) => {
            if source.case_insensitive {
                log::warn!("--case-insensitive is ignored for automaton files");
            }
            load_tree(path, source.format)
        }
        (None, None) => bail!("Either --keywords or --automaton is required"),
    }
}

fn cmd_build(
    keywords_path: &Path,
    output: &Path,
    format: Option<SerializationFormat>,
    gzip: bool,
    case_insensitive: bool,
    shortcuts: bool,
    finalize: bool,
) -> Result<()> {
    let keywords = read_keywords(keywords_path)?;
    let builder = KeywordTree::builder()
        .case_insensitive(case_insensitive)
        .shortcuts(shortcuts)
        .keywords(keywords);
    let tree = if finalize {
        builder.build_finalized()
    } else {
        builder.build()
    };

    let (ext_format, ext_gzip) = format_from_extension(output);
    let format = format.or(ext_format).unwrap_or(SerializationFormat::Bincode);
    let gzip = gzip || ext_gzip;
    save_tree(&tree, output, format, gzip)?;

    println!(
        "{} {} keywords ({} states) to {} [{}{}]",
        "Wrote".green().bold(),
        tree.keyword_count(),
        tree.state_count(),
        output.display().to_string().cyan(),
        format,
        if gzip { "+gzip" } else { "" }
    );
    Ok(())
}

fn cmd_search(text_path: Option<&Path>, source: &TreeSource, all: bool, timings: bool) -> Result<()> {
    let start = Instant::now();
    let tree = resolve_tree(source)?;
    let prepared = start.elapsed();

    if !tree.is_finalized() {
        bail!("Automaton is not finalized; rebuild it without --unfinalized");
    }

    let text = read_text(text_path)?;

    let start = Instant::now();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;
    if all {
        for m in tree.search_all(&text)? {
            writeln!(out, "{}\t{}", m.start(), m.keyword())?;
            count += 1;
        }
    } else if let Some(m) = tree.search(&text)? {
        writeln!(out, "{}\t{}", m.start(), m.keyword())?;
        count = 1;
    }
    out.flush()?;
    let searched = start.elapsed();

    if timings {
        eprintln!("{}", "Timings".bold().underline());
        eprintln!("  Prepare automaton: {}", format_duration(prepared));
        eprintln!("  Search:            {}", format_duration(searched));
        eprintln!("  Matches:           {}", count.to_string().green());
    }
    Ok(())
}

fn cmd_dot(source: &TreeSource, failure_links: bool, shortcuts: bool, output: Option<PathBuf>) -> Result<()> {
    let tree = resolve_tree(source)?;
    let dot = DotRenderer::new()
        .failure_links(failure_links)
        .shortcuts(shortcuts)
        .render(&tree);
    match output {
        Some(path) => fs::write(&path, dot)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", dot),
    }
    Ok(())
}

/// Size figures shown by `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Distinct keywords
    pub keywords: usize,
    /// States, the root included
    pub states: usize,
    /// Trie edges, one per non-root state
    pub trie_edges: usize,
    /// Transitions added by finalization
    pub shortcuts: usize,
}

impl TreeStats {
    /// Count the states and edges of `tree`.
    pub fn of(tree: &KeywordTree) -> Self {
        let transitions: usize = tree.states().iter().map(|s| s.transition_count()).sum();
        let trie_edges = tree.state_count() - 1;
        Self {
            keywords: tree.keyword_count(),
            states: tree.state_count(),
            trie_edges,
            shortcuts: transitions - trie_edges,
        }
    }
}

fn cmd_info(source: &TreeSource) -> Result<()> {
    let tree = resolve_tree(source)?;
    let stats = TreeStats::of(&tree);

    println!("{}", "Automaton Information".bold().underline());
    println!();
    if let Some(path) = source.automaton.as_ref().or(source.keywords.as_ref()) {
        println!("  Path:        {}", path.display().to_string().cyan());
    }
    println!("  Keywords:    {}", stats.keywords.to_string().green());
    println!("  States:      {}", stats.states.to_string().green());
    println!("  Trie edges:  {}", stats.trie_edges);
    println!("  Shortcuts:   {}", stats.shortcuts);
    println!("  Finalized:   {}", tree.is_finalized());
    println!("  Ignore case: {}", tree.is_case_insensitive());
    println!();
    Ok(())
}

fn cmd_bench(keywords_path: &Path, text_path: &Path, iterations: usize, case_insensitive: bool) -> Result<()> {
    let passes = u32::try_from(iterations.max(1))
        .with_context(|| format!("--iterations must be at most {}", u32::MAX))?;
    let keywords = read_keywords(keywords_path)?;
    let text = read_text(Some(text_path))?;

    let start = Instant::now();
    let mut tree = KeywordTree::new(case_insensitive);
    for keyword in &keywords {
        tree.add(keyword)?;
    }
    let added = start.elapsed();

    let start = Instant::now();
    tree.finalize()?;
    let finalized = start.elapsed();

    let mut matches = 0usize;
    let start = Instant::now();
    for _ in 0..passes {
        matches = tree.search_all(&text)?.count();
    }
    let searched = start.elapsed() / passes;

    let start = Instant::now();
    let mut buffer = Vec::new();
    BincodeSerializer::serialize(&tree, &mut buffer)?;
    let dumped = start.elapsed();

    let start = Instant::now();
    let loaded = BincodeSerializer::deserialize(&buffer[..])?;
    let restored = start.elapsed();
    if loaded != tree {
        bail!("Loaded automaton differs from the original");
    }

    let chars = text.chars().count();
    println!("{}", "Benchmark".bold().underline());
    println!();
    println!("  Keywords:  {} ({} states)", keywords.len(), tree.state_count());
    println!("  Text:      {} chars", chars);
    println!("  Matches:   {}", matches.to_string().green());
    println!();
    println!("  add:        {}", format_duration(added));
    println!("  finalize:   {}", format_duration(finalized));
    println!(
        "  search_all: {} per pass ({} passes, {:.1} MChar/s)",
        format_duration(searched),
        passes,
        chars as f64 / searched.as_secs_f64().max(f64::EPSILON) / 1e6
    );
    println!("  dump:       {} ({} bytes)", format_duration(dumped), buffer.len());
    println!("  load:       {}", format_duration(restored));
    Ok(())
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if duration.as_millis() > 0 {
        format!("{:.2}ms", duration.as_secs_f64() * 1e3)
    } else {
        format!("{}µs", duration.as_micros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_stats_count_shortcuts() {
        // "ab" fails to "b" and inherits 'c' -> "bc"
        let keywords = ["ab", "bc"];
        let stats = TreeStats::of(&KeywordTree::from_keywords(keywords));
        assert_eq!(
            stats,
            TreeStats {
                keywords: 2,
                states: 5,
                trie_edges: 4,
                shortcuts: 1
            }
        );

        let plain = KeywordTree::builder()
            .shortcuts(false)
            .keywords(keywords)
            .build_finalized();
        assert_eq!(TreeStats::of(&plain).shortcuts, 0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_millis(5)), "5.00ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
