use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use confparse::config::{discover, InputSection};
use confparse::{compile, parse_path, BlockAnnotation, ConfigTree, ParseOptions, QueryEngine};
use regex::Regex;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "confparse")]
#[command(about = "Query indentation-structured network device configurations", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $CONFPARSE_CONFIG or ~/.config/confparse/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lines matching a pattern
    Lines {
        pattern: String,
        /// Configuration files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print matching lines with their children
    Children {
        pattern: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Include every descendant, not only immediate children
        #[arg(short, long)]
        all: bool,
    },

    /// Print matching lines with their siblings and ancestors
    Blocks {
        pattern: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print parents selected by their children
    Parents {
        /// Pattern the parent line must match
        parent: String,

        /// Keep ancestors of lines matching this pattern
        #[arg(long, conflicts_with = "without", required_unless_present = "without")]
        with: Option<String>,

        /// Keep families with no immediate child matching this pattern
        #[arg(long)]
        without: Option<String>,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show the parsed family tree of a configuration
    Tree { path: PathBuf },

    /// Diff a section between two configurations
    Diff {
        pattern: String,
        old: PathBuf,
        new: PathBuf,
    },
}

/// One selection query shared by the per-file subcommands.
enum Selection {
    Lines(Regex),
    Children(Regex),
    AllChildren(Regex),
    Blocks(Regex),
    ParentsWith(Regex, Regex),
    ParentsWithout(Regex, Regex),
}

impl Selection {
    fn run<'t>(&self, engine: &QueryEngine<'t>) -> Vec<&'t str> {
        match self {
            Selection::Lines(re) => engine.find_lines(re),
            Selection::Children(re) => engine.find_children(re),
            Selection::AllChildren(re) => engine.find_all_children(re),
            Selection::Blocks(re) => engine.find_blocks(re),
            Selection::ParentsWith(parent, child) => engine.find_parents_with_child(parent, child),
            Selection::ParentsWithout(parent, child) => {
                engine.find_parents_without_child(parent, child)
            }
        }
    }
}

#[derive(Serialize)]
struct FileResult {
    file: PathBuf,
    lines: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = discover(cli.config.as_deref()).inspect_err(|err| {
        for name in err.offending_blocks() {
            eprintln!("{}", format!("  fix or remove [[blocks]] entry '{name}'").yellow());
        }
    })?;
    let options = settings.parse_options()?;

    let matched = match cli.command {
        Commands::Lines { pattern, paths } => {
            let selection = Selection::Lines(compile(&pattern)?);
            let matched = cmd_select(&selection, &paths, &settings.input, &options, cli.json)?;
            if !matched && !cli.json {
                suggest_line(&pattern, &paths, &settings.input, &options)?;
            }
            matched
        }

        Commands::Children {
            pattern,
            paths,
            all,
        } => {
            let re = compile(&pattern)?;
            let selection = if all {
                Selection::AllChildren(re)
            } else {
                Selection::Children(re)
            };
            cmd_select(&selection, &paths, &settings.input, &options, cli.json)?
        }

        Commands::Blocks { pattern, paths } => {
            let selection = Selection::Blocks(compile(&pattern)?);
            cmd_select(&selection, &paths, &settings.input, &options, cli.json)?
        }

        Commands::Parents {
            parent,
            with,
            without,
            paths,
        } => {
            let parent = compile(&parent)?;
            let selection = match (with, without) {
                (Some(child), _) => Selection::ParentsWith(parent, compile(&child)?),
                (None, Some(child)) => Selection::ParentsWithout(parent, compile(&child)?),
                (None, None) => anyhow::bail!("one of --with or --without is required"),
            };
            cmd_select(&selection, &paths, &settings.input, &options, cli.json)?
        }

        Commands::Tree { path } => cmd_tree(&path, &options, cli.json)?,

        Commands::Diff { pattern, old, new } => cmd_diff(&pattern, &old, &new, &options)?,
    };

    if !matched {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        builder.filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    builder.init();
}

/// Expand directories into the configuration files they contain.
///
/// Files given explicitly are always kept; files found inside directories
/// are filtered by the configured extensions.
fn expand_paths(paths: &[PathBuf], input: &InputSection) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            let accepted = entry
                .path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| input.accepts(ext));
            if entry.file_type().is_file() && accepted {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        log::info!("{} configuration files under {}", found.len(), path.display());
        files.extend(found);
    }

    if files.is_empty() {
        anyhow::bail!("no configuration files found");
    }
    Ok(files)
}

fn load_tree(path: &Path, options: &ParseOptions) -> Result<ConfigTree> {
    let tree = parse_path(path, options)?;
    let folded = tree.annotations().iter().filter(|a| a.is_annotated()).count();
    log::info!(
        "{}: {} lines, {} blocks folded",
        path.display(),
        tree.len(),
        folded
    );
    Ok(tree)
}

fn cmd_select(
    selection: &Selection,
    paths: &[PathBuf],
    input: &InputSection,
    options: &ParseOptions,
    json: bool,
) -> Result<bool> {
    let files = expand_paths(paths, input)?;
    let show_headers = files.len() > 1;

    let mut results = Vec::new();
    for file in &files {
        let tree = load_tree(file, options)?;
        let lines = selection.run(&tree.query());
        if lines.is_empty() {
            continue;
        }

        if !json {
            if show_headers {
                println!("{}", format!("==> {} <==", file.display()).bold());
            }
            for line in &lines {
                println!("{line}");
            }
        }

        results.push(FileResult {
            file: file.clone(),
            lines: lines.into_iter().map(str::to_string).collect(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(!results.is_empty())
}

/// Point at the closest line when a plain search found nothing.
fn suggest_line(
    pattern: &str,
    paths: &[PathBuf],
    input: &InputSection,
    options: &ParseOptions,
) -> Result<()> {
    let mut best: Option<(f64, String)> = None;
    for file in expand_paths(paths, input)? {
        let tree = load_tree(&file, options)?;
        for line in tree.lines().iter().filter(|l| !l.is_comment()) {
            let candidate = line.text().trim();
            let score = strsim::normalized_levenshtein(pattern, candidate);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, candidate.to_string()));
            }
        }
    }

    eprintln!("{}", format!("No lines matched '{pattern}'").red());
    if let Some((score, line)) = best.filter(|(score, _)| *score >= 0.5) {
        log::debug!("closest line scored {score:.2}");
        eprintln!("  Closest line: {}", line.cyan());
    }
    Ok(())
}

fn cmd_tree(path: &Path, options: &ParseOptions, json: bool) -> Result<bool> {
    let tree = load_tree(path, options)?;

    if json {
        #[derive(Serialize)]
        struct TreeDump<'a> {
            lines: &'a [confparse::ConfigLine],
            annotations: &'a [BlockAnnotation],
        }
        let dump = TreeDump {
            lines: tree.lines(),
            annotations: tree.annotations(),
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(!tree.is_empty());
    }

    let engine = tree.query();
    for line in tree.lines() {
        let text = format!("{:>5}  {}", line.index() + 1, line.text());
        if line.is_comment() {
            println!("{}", text.dimmed());
        } else if line.is_oldest_ancestor() {
            let endpoint = line.family_endpoint().unwrap_or(tree.len());
            let summary = format!(
                "[{} descendants, family ends before line {}]",
                engine.descendants(line.index()).len(),
                endpoint + 1
            );
            println!("{} {}", text.bold(), summary.dimmed());
        } else if line.parent().is_none() && line.depth() > 0 {
            println!("{} {}", text.yellow(), "[unattached]".yellow());
        } else {
            println!("{text}");
        }
    }

    Ok(!tree.is_empty())
}

fn cmd_diff(pattern: &str, old: &Path, new: &Path, options: &ParseOptions) -> Result<bool> {
    let re = compile(pattern)?;
    let old_tree = load_tree(old, options).with_context(|| format!("loading {}", old.display()))?;
    let new_tree = load_tree(new, options).with_context(|| format!("loading {}", new.display()))?;

    let before = old_tree.query().find_all_children(&re);
    let after = new_tree.query().find_all_children(&re);
    if before.is_empty() && after.is_empty() {
        eprintln!("{}", format!("No lines matched '{pattern}' in either file").red());
        return Ok(false);
    }

    let before = section_text(&before);
    let after = section_text(&after);

    println!("{}", format!("--- {}", old.display()).dimmed());
    println!("{}", format!("+++ {}", new.display()).dimmed());

    let diff = TextDiff::from_lines(&before, &after);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }

    Ok(true)
}

fn section_text(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
