use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::ingest;
use crate::config::Config;
use crate::github::GithubSync;
use crate::messages;
use crate::queue::TaskQueue;
use crate::script::generate_script;
use crate::selection::BulkOp;
use crate::session::{Draft, Session};
use crate::textstudio::build_text_prompt;
use crate::warehouse::{self, read_words};

/// Keyword warehouse and key-visual prompt assembly.
#[derive(Parser)]
#[command(name = "kvengine", version)]
#[command(about = "Assemble, refine and queue AI key-visual prompts from categorized keyword lists")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the local word-list files.
    #[arg(long, default_value = "data", env = "KV_DATA_DIR", global = true)]
    pub data_dir: PathBuf,

    /// File the task queue is persisted to between invocations, in the
    /// same double-newline format the queue exports.
    #[arg(long, default_value = "queue.txt", env = "KV_QUEUE_FILE", global = true)]
    pub queue_file: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show keyword counts per category, grouped by tier.
    Categories,

    /// Print one category's word list.
    Words { category: String },

    /// Add a keyword to a category and persist it.
    Add { category: String, keyword: String },

    /// Remove a keyword from a category and persist the change.
    Remove { category: String, keyword: String },

    /// Assemble random keyword skeletons into draft prompts and queue them.
    #[command(alias = "gen")]
    Generate {
        /// Free-text core idea placed first in every skeleton.
        #[arg(default_value = "")]
        idea: String,

        /// Number of drafts to produce.
        #[arg(short = 'n', long, default_value = "4")]
        count: usize,

        /// Restrict a category to the listed keywords, e.g.
        /// "Mood=calm,bold". Repeatable. Any restriction locks the scope.
        #[arg(long)]
        pool: Vec<String>,

        /// Exclude a category from sampling entirely. Repeatable.
        #[arg(long)]
        exclude: Vec<String>,

        /// Skip the refine call even when an API key is configured.
        #[arg(long)]
        no_refine: bool,

        /// Seed the sampler for reproducible draws.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build tattoo/text-overlay prompts from a word bank and queue them.
    Text {
        /// Custom text; beats the word bank when given.
        #[arg(long)]
        word: Option<String>,

        /// Word-bank file name under <data-dir>/text/.
        #[arg(long, default_value = "text_en.txt")]
        bank: String,

        /// Reference image file name. Repeatable; one is picked at random.
        #[arg(long)]
        image: Vec<String>,

        /// Base URL the picked image name is appended to.
        #[arg(long, default_value = "")]
        image_base: String,

        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Split free text into categorized keywords via the chat model and
    /// import them into the warehouse.
    Ingest {
        text: String,

        /// Show what would be imported without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or export the persisted task queue.
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Print the queued tasks.
    Show,
    /// Empty the queue.
    Clear,
    /// Render the browser automation script for the queued tasks.
    Script {
        /// Write the script here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_queue(path: &Path) -> Result<TaskQueue> {
    if !path.exists() {
        return Ok(TaskQueue::new());
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(TaskQueue::import_text(&text))
}

fn store_queue(path: &Path, queue: &TaskQueue) -> Result<()> {
    fs::write(path, queue.export_text()).with_context(|| format!("writing {}", path.display()))
}

fn sampler(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Parse one `--pool "Category=word1,word2"` argument.
fn parse_pool_arg(arg: &str) -> Result<(&'static str, Vec<String>)> {
    let (category, words) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected Category=word1,word2 but got {arg:?}"))?;
    let spec = warehouse::category(category.trim())
        .ok_or_else(|| anyhow!("unknown category: {category}"))?;
    let words = words
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    Ok((spec.name, words))
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let mut session = Session::new(&cli.data_dir);
    session.queue = load_queue(&cli.queue_file)?;

    match cli.command {
        Commands::Categories => {
            let counts = session.warehouse.counts()?;
            let mut tier = None;
            for (spec, count) in counts {
                if tier != Some(spec.tier) {
                    println!("{}", spec.tier.label());
                    tier = Some(spec.tier);
                }
                println!("  {:<14} {count}", spec.name);
            }
        }

        Commands::Words { category } => {
            for word in session.warehouse.load(&category)? {
                println!("{word}");
            }
        }

        Commands::Add { category, keyword } => {
            if session.warehouse.add(&category, &keyword)? {
                println!("{}", messages::KEYWORD_ADDED);
                match &config.github {
                    Some(gh) => {
                        let sync = GithubSync::new(gh.clone());
                        if let Some(warning) = session.sync_remote(&sync, &category).await {
                            println!("{}", messages::remote_sync_warning(&warning));
                        }
                    }
                    None => println!("{}", messages::REMOTE_SYNC_SKIPPED),
                }
            } else {
                println!("{}", messages::KEYWORD_EXISTS);
            }
        }

        Commands::Remove { category, keyword } => {
            if session.warehouse.remove(&category, &keyword)? {
                println!("{}", messages::KEYWORD_REMOVED);
                match &config.github {
                    Some(gh) => {
                        let sync = GithubSync::new(gh.clone());
                        if let Some(warning) = session.sync_remote(&sync, &category).await {
                            println!("{}", messages::remote_sync_warning(&warning));
                        }
                    }
                    None => println!("{}", messages::REMOTE_SYNC_SKIPPED),
                }
            } else {
                println!("{}", messages::KEYWORD_MISSING);
            }
        }

        Commands::Generate {
            idea,
            count,
            pool,
            exclude,
            no_refine,
            seed,
        } => {
            session.init_selection()?;

            let scoped = !pool.is_empty() || !exclude.is_empty();
            for arg in &pool {
                let (category, words) = parse_pool_arg(arg)?;
                session.selection.bulk(category, BulkOp::ClearAll);
                for word in words {
                    session.selection.set(category, &word, true);
                }
            }
            for category in &exclude {
                let spec = warehouse::category(category.trim())
                    .ok_or_else(|| anyhow!("unknown category: {category}"))?;
                session.selection.bulk(spec.name, BulkOp::ClearAll);
            }
            if scoped {
                session.lock_scope()?;
                let mut empty = Vec::new();
                for name in warehouse::category_names() {
                    if session.pool(name)?.is_empty() {
                        empty.push(name);
                    }
                }
                if empty.is_empty() {
                    println!("{}", messages::SCOPE_LOCKED);
                } else {
                    println!("{}", messages::empty_categories_notice(&empty));
                }
            } else {
                println!("{}", messages::NO_SCOPE_HINT);
            }

            let ai = if no_refine { None } else { config.ai.as_ref() };
            if ai.is_none() && !no_refine {
                println!("{}", messages::AI_OFFLINE_HINT);
            }

            let mut rng = sampler(seed);
            let drafts = session.generate(&mut rng, &idea, count, ai).await?;
            for (i, draft) in drafts.iter().enumerate() {
                match draft {
                    Draft::Empty => println!("Draft {}: {}", i + 1, messages::EMPTY_SKELETON),
                    Draft::Ready { skeleton, prompt } => {
                        println!("Draft {} [{skeleton}]\n{prompt}\n", i + 1);
                    }
                }
            }
            store_queue(&cli.queue_file, &session.queue)?;
        }

        Commands::Text {
            word,
            bank,
            image,
            image_base,
            count,
            seed,
        } => {
            let bank_path = cli.data_dir.join("text").join(&bank);
            let word_bank = read_words(&bank_path)?;
            let mut rng = sampler(seed);
            let mut prompts = Vec::with_capacity(count);
            for _ in 0..count {
                let out =
                    build_text_prompt(&mut rng, &word_bank, word.as_deref(), &image, &image_base)?;
                println!("{}", out.prompt);
                prompts.push(out.prompt);
            }
            session.queue.enqueue(prompts);
            store_queue(&cli.queue_file, &session.queue)?;
        }

        Commands::Ingest { text, dry_run } => {
            let ai = config
                .ai
                .as_ref()
                .ok_or_else(|| anyhow!("ingest needs DEEPSEEK_API_KEY"))?;
            let parsed = ingest::parse_keywords(ai, &text).await?;
            if parsed.is_empty() {
                println!("{}", messages::NOTHING_INGESTED);
                return Ok(());
            }
            for item in &parsed {
                println!("{:<14} {}", item.category, item.keyword);
            }
            if dry_run {
                return Ok(());
            }
            let changed = session.import_keywords(&parsed)?;
            if let Some(gh) = &config.github {
                let sync = GithubSync::new(gh.clone());
                for category in changed {
                    if let Some(warning) = session.sync_remote(&sync, category).await {
                        println!("{}", messages::remote_sync_warning(&warning));
                    }
                }
            } else if !changed.is_empty() {
                println!("{}", messages::REMOTE_SYNC_SKIPPED);
            }
        }

        Commands::Queue { command } => match command {
            QueueCommands::Show => {
                if session.queue.is_empty() {
                    println!("{}", messages::QUEUE_EMPTY);
                } else {
                    println!("{}", session.queue.export_text());
                }
            }
            QueueCommands::Clear => {
                session.queue.clear();
                store_queue(&cli.queue_file, &session.queue)?;
            }
            QueueCommands::Script { out } => {
                let script = generate_script(session.queue.tasks())?;
                match out {
                    Some(path) => fs::write(&path, script)
                        .with_context(|| format!("writing {}", path.display()))?,
                    None => println!("{script}"),
                }
            }
        },
    }

    Ok(())
}
