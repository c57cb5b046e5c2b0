use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};

mod breakdown_command;
mod charts_command;
mod console;
mod datetime;
mod log_command;
mod metrics;
mod reconcile;
mod record;
mod rollup;
mod store;
mod time_slot;
mod timeline_command;
mod week;

use breakdown_command::{BreakdownArgs, BreakdownCommand};
use charts_command::{ChartsArgs, ChartsCommand};
use console::{ConsoleMarkdownList, ConsolePresenter};
use log_command::{LogArgs, LogCommand};
use record::sort_slots_by_time;
use store::JsonStore;
use timeline_command::{TimelineArgs, TimelineCommand};

/// 30分枠の活動記録と年間集計を行うCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- log -d 2024-01-03 -s 08:00=Sleep -s 08:30=Sleep
/// $ cargo run -- charts -y 2024 -c Sleep
/// $ cargo run -- breakdown -y 2024
/// $ cargo run -- timeline -d 2024-01-03
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Log(LogArgs),
    Charts(ChartsArgs),
    Breakdown(BreakdownArgs),
    Timeline(TimelineArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logger()?;

    let store = JsonStore::open().context("Failed to open record store")?;
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);

    match args.subcommand {
        SubCommands::Log(log_args) => {
            let record = LogCommand::new(&store).run(log_args).await?;
            presenter.show_timeline(record.date, &sort_slots_by_time(&record.slots))?;
        }
        SubCommands::Charts(charts_args) => {
            let all_series = ChartsCommand::new(&store).run(charts_args).await?;
            for series in &all_series {
                presenter.show_series(&series.title, &series.points)?;
            }
        }
        SubCommands::Breakdown(breakdown_args) => {
            let (year, rows) = BreakdownCommand::new(&store).run(breakdown_args).await?;
            presenter.show_breakdown(year, &rows)?;
        }
        SubCommands::Timeline(timeline_args) => {
            let (date, slots) = TimelineCommand::new(&store).run(timeline_args).await?;
            presenter.show_timeline(date, &slots)?;
        }
    }

    Ok(())
}

/// ロガーを初期化する。
///
/// 集計結果はstdoutへ出力するため、ログはstderrへ流す。
fn setup_logger() -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] {}",
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logger")
}
