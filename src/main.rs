use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use locality::{
    configs::AppConfig,
    generator::{Generator, OutputTargets, resolve_target_languages},
    overrides::OverrideTable,
    pacing::{FixedInterval, NoDelay, Pacer},
    translations::{JsonAdapter, Translatable},
    translators::{DryRunTranslator, GoogleTranslator, Translator},
};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(Parser)]
#[command(name = "locality")]
#[command(about = "Translate JSON localization files", long_about = None)]
struct Args {
    #[arg(
        value_parser = check_file_exists,
        help = "Path to TOML configuration file (defaults apply without one)"
    )]
    config_path: Option<PathBuf>,

    #[arg(short, long, help = "Dry run mode (no actual translation)")]
    dry_run: bool,

    #[arg(short, long, help = "Force write even in dry run mode")]
    force_write: bool,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Only translate these language codes (skips the supported-language list)"
    )]
    only: Option<Vec<String>>,
}

fn check_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File '{}' not found", s))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locality=info".parse()?),
        )
        .init();

    println!("🌍 Locality Translator");

    let (config, base_dir) = match &args.config_path {
        Some(path) => {
            println!("📋 Config: {}", path.display());
            let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (AppConfig::load(path)?, base_dir)
        }
        None => (AppConfig::default(), PathBuf::from(".")),
    };

    let translator: Box<dyn Translator> = if args.dry_run {
        println!("🔍 Mode: DRY RUN");
        Box::new(DryRunTranslator)
    } else {
        Box::new(GoogleTranslator::new(
            &config.service.base_url,
            Duration::from_secs(config.service.timeout_secs),
        )?)
    };

    let target_langs = match &args.only {
        Some(only) => resolve_target_languages(only, std::iter::empty(), &config.source.language),
        None if config.translation.include_supported => {
            let supported = translator
                .supported_languages()
                .await
                .context("Failed to fetch supported languages")?;
            resolve_target_languages(
                &config.translation.target_languages,
                supported.values().map(String::as_str),
                &config.source.language,
            )
        }
        None => resolve_target_languages(
            &config.translation.target_languages,
            std::iter::empty(),
            &config.source.language,
        ),
    };

    println!("🎯 Target languages: {}", target_langs.join(", "));

    let source_path = config.source_path(&base_dir);
    let source = JsonAdapter::load_document(&source_path)?;
    println!("📄 Source: {}", source_path.display());

    let pacer: Box<dyn Pacer> = if args.dry_run {
        Box::new(NoDelay)
    } else {
        Box::new(FixedInterval::new(config.translation.delay()))
    };

    let overrides = if config.translation.builtin_overrides {
        OverrideTable::builtin()
    } else {
        OverrideTable::default()
    }
    .with_entries(config.overrides.iter().cloned());

    if overrides.is_empty() {
        println!("✍️  Overrides: none");
    } else {
        println!("✍️  Overrides: {} entries", overrides.len());
    }

    let generator =
        Generator::new(translator, pacer, overrides).with_source_lang(&config.source.language);

    let outputs = OutputTargets {
        primary_dir: config.primary_dir(&base_dir),
        secondary_dir: config.secondary_dir(&base_dir),
        indent: config.output.indent,
        write: !args.dry_run || args.force_write,
    };

    let pb = ProgressBar::new(target_langs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} langs ({msg})")?
            .progress_chars("█▓▒░"),
    );

    let reports = generator.run(&source, &target_langs, &outputs, &pb).await?;
    pb.finish_with_message("done");

    if args.dry_run {
        let source_leaves = source.leaves();
        for report in &reports {
            pb.println(format!("\n--- Dry Run Preview ({}) ---", report.lang));
            let translated = report.document.leaves();
            for (i, (from, to)) in source_leaves.iter().zip(&translated).take(5).enumerate() {
                pb.println(format!("#{:02} {} => {}", i + 1, from, to));
            }
            if translated.len() > 5 {
                pb.println(format!("... and {} more", translated.len() - 5));
            }
            pb.println("-------------------------------\n".to_string());
        }
    }

    let total_overridden: usize = reports.iter().map(|r| r.tally.overridden).sum();
    let total_translated: usize = reports.iter().map(|r| r.tally.translated).sum();
    let total_failed: usize = reports.iter().map(|r| r.tally.failed).sum();
    let total_files: usize = reports.iter().map(|r| r.written.len()).sum();

    let duration = start_time.elapsed();

    println!("📊 Summary");
    println!("🌐 Languages: {}", reports.len());
    println!("📝 Translated: {} strings", total_translated);
    println!("✍️  Overridden: {} strings", total_overridden);
    println!("⚠️  Left untranslated: {} strings", total_failed);
    println!("💾 Written: {} files", total_files);
    println!("⏱️ Duration: {:.2}s\n", duration.as_secs_f64());

    Ok(())
}
