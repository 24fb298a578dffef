use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::config::{AppConfig, DeliveryMode};
use crate::reporting::format_currency;
use crate::roi::{RoiResult, AUTOMATION_COST};
use crate::telemetry::init_tracing;
use crate::web::{export_calculator_page, serve};
use crate::{run, Args, RunOutcome};

// ============================================================================
// BRANDING
// ============================================================================

const BANNER: &str = r#"
 __      __       _     __ _                 ___  ___ ___
 \ \    / /__ _ _| |__ / _| |_____ __ __    | _ \/ _ \_ _|
  \ \/\/ / _ \ '_| / /|  _| / _ \ V  V /    |   / (_) | |
   \_/\_/\___/_| |_\_\|_| |_\___/\_/\_/     |_|_\\___/___|
"#;

const TAGLINE: &str = "Estimate what manual work costs and when automation pays back";
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// CLI STRUCTURE
// ============================================================================

#[derive(Parser)]
#[command(name = "workflow-roi")]
#[command(version = VERSION)]
#[command(about = "Workflow ROI calculator and report delivery", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute ROI figures and optionally deliver the report
    #[command(visible_alias = "calc")]
    Calculate {
        /// Employees doing manual work
        #[arg(short = 't', long)]
        team_members: u32,

        /// Manual-work hours per employee each week (max 168)
        #[arg(short = 'w', long)]
        hours_per_week: f64,

        /// Fully-loaded hourly cost
        #[arg(short = 'r', long)]
        hourly_rate: f64,

        /// Monthly cost of manual-work errors
        #[arg(long, default_value_t = 0.0)]
        monthly_error_cost: f64,

        /// Average cost of a single error (informational)
        #[arg(long, default_value_t = 0.0)]
        cost_per_error: f64,

        /// Report recipient
        #[arg(short, long)]
        email: String,

        /// Deliver the report after computing it
        #[arg(long)]
        send: bool,

        /// Delivery strategy (defaults to REPORT_DELIVERY / USE_MOCK_EMAIL)
        #[arg(short, long, value_enum)]
        delivery: Option<DeliveryMode>,
    },

    /// Serve the calculator page and report endpoints over HTTP
    Serve {
        /// Listen address (defaults to BIND_ADDR or 0.0.0.0:8080)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Delivery strategy for /api/send-email and the calculator form
        #[arg(short, long, value_enum)]
        delivery: Option<DeliveryMode>,
    },

    /// Export the calculator page as static HTML
    Export {
        /// Output directory
        #[arg(short, long, default_value = "landing-page")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

// ============================================================================
// TERMINAL UI
// ============================================================================

struct TerminalUI;

impl TerminalUI {
    fn show_intro() {
        println!("{}", BANNER.bright_green().bold());
        println!("{}", "═".repeat(62).bright_black());
        println!("{:^62}", TAGLINE.bright_white());
        println!("{:^62}", format!("v{}", VERSION).bright_black());
        println!("{}", "═".repeat(62).bright_black());
        println!();
    }

    fn print_section(title: &str) {
        println!();
        println!("{}", format!("┌─ {} ", title).bright_white().bold());
        println!("{}", "│".bright_black());
    }

    fn print_section_end() {
        println!("{}", "└─".bright_black());
    }

    fn print_row(label: &str, value: String) {
        println!("{}  {:<28} {}", "│".bright_black(), label, value);
    }

    fn print_success(message: &str) {
        println!("  {} {}", "✓".bright_green().bold(), message.bright_white());
    }

    fn print_error(message: &str) {
        eprintln!("  {} {}", "✗".bright_red().bold(), message.bright_red());
    }

    fn print_info(message: &str) {
        println!("  {} {}", "ℹ".bright_blue(), message);
    }

    fn print_results(result: &RoiResult) {
        Self::print_section("ROI Analysis");
        Self::print_row(
            "Current monthly loss",
            format!("${}", format_currency(result.monthly_loss))
                .bright_red()
                .bold()
                .to_string(),
        );
        Self::print_row(
            "Break-even timeline",
            result.break_even().to_string().bright_yellow().bold().to_string(),
        );
        let savings = format!("${}", format_currency(result.annual_savings));
        let savings = if result.is_viable() {
            savings.bright_green().bold().to_string()
        } else {
            format!("{} (not viable in year one)", savings)
                .bright_black()
                .to_string()
        };
        Self::print_row("Annual savings potential", savings);
        Self::print_row(
            "Automation investment",
            format!("${}", format_currency(AUTOMATION_COST)),
        );
        Self::print_section_end();
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

pub struct RoiCli;

impl RoiCli {
    pub async fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();
        init_tracing(cli.verbose);

        match cli.command {
            Some(Commands::Calculate {
                team_members,
                hours_per_week,
                hourly_rate,
                monthly_error_cost,
                cost_per_error,
                email,
                send,
                delivery,
            }) => {
                let args = Args {
                    team_members: f64::from(team_members),
                    hours_per_week,
                    hourly_rate,
                    monthly_error_cost,
                    cost_per_error,
                    email,
                    send,
                    deliver: delivery,
                };
                Self::calculate(args).await
            }
            Some(Commands::Serve { bind, delivery }) => {
                let mut config = AppConfig::from_env()?;
                if let Some(bind) = bind {
                    config.bind_addr = bind;
                }
                if let Some(delivery) = delivery {
                    config.delivery = delivery;
                }
                TerminalUI::show_intro();
                TerminalUI::print_info(&format!(
                    "Listening on http://{} (delivery: {})",
                    config.bind_addr, config.delivery
                ));
                serve(config).await
            }
            Some(Commands::Export { output }) => {
                let config = AppConfig::from_env()?;
                let path = export_calculator_page(&output, config.delivery)?;
                TerminalUI::print_success(&format!("Wrote {}", path.display()));
                Ok(())
            }
            Some(Commands::Version) => {
                println!("workflow-roi {}", VERSION);
                Ok(())
            }
            None => {
                TerminalUI::show_intro();
                TerminalUI::print_info("Run `workflow-roi --help` to see available commands.");
                Ok(())
            }
        }
    }

    async fn calculate(args: Args) -> anyhow::Result<()> {
        match run(args).await {
            Ok(RunOutcome {
                result, receipt, ..
            }) => {
                TerminalUI::print_results(&result);
                if let Some(receipt) = receipt {
                    TerminalUI::print_success(&receipt.message);
                } else {
                    TerminalUI::print_info("Pass --send to deliver this report.");
                }
                Ok(())
            }
            Err(err) => {
                TerminalUI::print_error(&err.to_string());
                Err(err)
            }
        }
    }
}
