//! cputier - ARM64 capability tier classifier
//!
//! The CLI entry point, handling:
//! - Feature reports (`features`)
//! - Best-tier selection (`tier`)
//! - Single feature checks for scripts (`check`)
//! - Tier listing (`tiers`)

use clap::{Args, Parser, Subcommand};
use ct_common::{
    CapabilityMask, Error, FeatureFlag, OutputFormat, Result, StructuredError, Tier,
    SCHEMA_VERSION,
};
use ct_core::config::SourceConfig;
use ct_core::exit_codes::ExitCode;
use ct_core::hwcap::CapabilitySource;
use ct_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ct_core::CpuFeatures;
use std::io::Write;

/// cputier - pick the best ARM64 build tier for this CPU
#[derive(Parser)]
#[command(name = "cputier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Diagnostic log format on stderr: human or jsonl (overrides CT_LOG_FORMAT)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Use this AT_HWCAP2 word instead of reading the CPU (hex, binary or decimal).
    /// Also read from CPUTIER_HWCAP2.
    #[arg(long, global = true, value_name = "MASK")]
    hwcap2: Option<CapabilityMask>,

    /// Fail instead of reporting baseline when the capability word cannot be read
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every recognized feature and the best tier (default)
    Features,

    /// Print the best tier for this CPU
    Tier(TierArgs),

    /// Exit 0 if a feature is present, 1 if it is absent
    Check(CheckArgs),

    /// List all tiers, highest first
    Tiers,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct TierArgs {
    /// Also print the tiers a loader may fall back to
    #[arg(long)]
    chain: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Feature to test: dotprod, sve2 (alias armv9) or i8mm
    feature: FeatureFlag,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not errors.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let result = match &cli.command {
        None | Some(Commands::Features) => run_features(&cli.global),
        Some(Commands::Tier(args)) => run_tier(&cli.global, args),
        Some(Commands::Check(args)) => run_check(&cli.global, args),
        Some(Commands::Tiers) => run_tiers(&cli.global),
        Some(Commands::Version) => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => report_error(&cli.global, &err),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn cpu_features(global: &GlobalOpts) -> Result<CpuFeatures<Box<dyn CapabilitySource>>> {
    let source = SourceConfig::from_env(global.hwcap2)?.build();
    let cpu = CpuFeatures::with_source(source);

    if global.strict && !cpu.reading().is_available() {
        return Err(Error::UnsupportedPlatform(format!(
            "AT_HWCAP2 unavailable on {}-{}",
            std::env::consts::ARCH,
            std::env::consts::OS
        )));
    }
    Ok(cpu)
}

fn run_features(global: &GlobalOpts) -> Result<ExitCode> {
    let report = cpu_features(global)?.report();

    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "features": report,
            });
            emit_json(&output)?;
        }
        OutputFormat::Md => emit(&report.to_markdown())?,
        OutputFormat::Summary => emit(&format!("{}\n", report.summary()))?,
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn run_tier(global: &GlobalOpts, args: &TierArgs) -> Result<ExitCode> {
    let tier = cpu_features(global)?.best_tier();
    let chain: Vec<&str> = tier.fallback_chain().iter().map(|t| t.as_str()).collect();

    match global.format {
        OutputFormat::Json => {
            let mut output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "tier": tier,
                "description": tier.description(),
            });
            if args.chain {
                output["candidates"] = serde_json::json!(chain);
            }
            emit_json(&output)?;
        }
        OutputFormat::Md => {
            let mut out = format!("Best tier: **{}** ({})\n", tier, tier.description());
            if args.chain {
                out.push_str(&format!("\nCandidates: {}\n", chain.join(" -> ")));
            }
            emit(&out)?;
        }
        OutputFormat::Summary => {
            if args.chain {
                emit(&format!("{}\n", chain.join(" ")))?;
            } else {
                emit(&format!("{}\n", tier))?;
            }
        }
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> Result<ExitCode> {
    let present = cpu_features(global)?.has(args.feature);

    match global.format {
        OutputFormat::Json => emit_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "feature": args.feature,
            "description": args.feature.description(),
            "present": present,
        }))?,
        OutputFormat::Md | OutputFormat::Summary => emit(&format!(
            "{}: {}\n",
            args.feature,
            if present { "present" } else { "absent" }
        ))?,
        OutputFormat::Exitcode => {}
    }

    Ok(if present {
        ExitCode::Clean
    } else {
        ExitCode::FeatureAbsent
    })
}

fn run_tiers(global: &GlobalOpts) -> Result<ExitCode> {
    match global.format {
        OutputFormat::Json => {
            let tiers: Vec<serde_json::Value> = Tier::ALL
                .iter()
                .map(|tier| {
                    serde_json::json!({
                        "tier": tier,
                        "description": tier.description(),
                        "requires": tier.required_feature(),
                    })
                })
                .collect();
            emit_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "tiers": tiers,
            }))?;
        }
        OutputFormat::Md => {
            let mut out = String::from("| Tier | Architecture | Requires |\n|------|--------------|----------|\n");
            for tier in Tier::ALL {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    tier,
                    tier.description(),
                    tier.required_feature()
                        .map(|f| f.as_str())
                        .unwrap_or("-")
                ));
            }
            emit(&out)?;
        }
        OutputFormat::Summary => {
            let names: Vec<&str> = Tier::ALL.iter().map(|t| t.as_str()).collect();
            emit(&format!("{}\n", names.join(" ")))?;
        }
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) -> Result<ExitCode> {
    match global.format {
        OutputFormat::Json => emit_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "cputier_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        }))?,
        OutputFormat::Exitcode => {}
        _ => emit(&format!(
            "cputier {}\nschema version: {}\n",
            env!("CARGO_PKG_VERSION"),
            SCHEMA_VERSION
        ))?,
    }
    Ok(ExitCode::Clean)
}

// ============================================================================
// Output helpers
// ============================================================================

fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn emit_json(value: &serde_json::Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    emit(&text)
}

fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let code = ExitCode::from(err);
    tracing::error!(target: "cputier::cli", code = err.code(), "{}", err);

    match global.format {
        OutputFormat::Json => {
            eprintln!("{}", StructuredError::from(err).to_json_pretty());
        }
        OutputFormat::Exitcode => {}
        _ => {
            eprintln!("error: {}", err);
            eprintln!("  fix: {}", err.remediation());
        }
    }
    code
}
