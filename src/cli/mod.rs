pub mod analyze;
pub mod output;
pub mod prompt;
pub mod record;
pub mod show;

use std::path::PathBuf;

use analyze::{analyze_period, Period};
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{CommandFactory, Parser};
use output::chart::SvgChartRenderer;
use prompt::{Prompter, StdinPrompter};
use record::{record_day, update_day};
use show::show_day;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    config::{TrackerConfig, DEFAULT_CHART_NAME},
    storage::record_storage::RecordStorageImpl,
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
        time::{parse_clock_time, parse_day, DateStyle},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Daytally", version, long_about = None)]
#[command(
    about = "Record what you did in every 15 minutes of a day. Without options records today (or yesterday, before the day starts)"
)]
struct Args {
    #[arg(
        long,
        value_name = "DATE",
        num_args = 0..=1,
        conflicts_with_all = ["analyze", "update"],
        help = "Show schedule for a day. The date is asked for when omitted"
    )]
    show: Option<Option<String>>,
    #[arg(
        long,
        value_name = "PERIOD",
        conflicts_with = "update",
        help = "Analyze schedules of the last week (7 days) or month (30 days)"
    )]
    analyze: Option<Period>,
    #[arg(
        long,
        value_name = "DATE",
        help = "Update schedule for a given date. Examples are \"2025-03-15\", \"yesterday\", \"15/03/2025\""
    )]
    update: Option<String>,
    #[arg(
        long,
        help = "Records directory. By default records are saved into $XDG_STATE_HOME/daytally/records or $HOME/.local/state/daytally/records"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long = "start-time",
        value_name = "HH:MM",
        default_value = "07:00",
        value_parser = parse_start_time,
        help = "Time your day starts at"
    )]
    start_time: NaiveTime,
    #[arg(long, default_value = DEFAULT_CHART_NAME, help = "Where the analysis chart is written")]
    chart: PathBuf,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

fn parse_start_time(value: &str) -> Result<NaiveTime, String> {
    parse_clock_time(value).map_err(|e| e.to_string())
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let records_dir = args.dir.clone().unwrap_or_else(|| app_dir.join("records"));
    let config = TrackerConfig::new(records_dir)
        .with_day_start(args.start_time)
        .with_chart_path(args.chart.clone());
    info!("Using {config:?}");

    let storage = RecordStorageImpl::new(config.records_dir.clone())?;
    let mut prompter = StdinPrompter::new();

    if let Some(date) = args.show {
        let date = match date {
            Some(date) => date,
            None => match prompter.ask("Enter date (YYYY-MM-DD): ").await? {
                Some(date) => date,
                None => return Ok(()),
            },
        };
        let date = parse_date_arg(&date, args.date_style)?;
        show_day(&storage, date).await?;
    } else if let Some(period) = args.analyze {
        let renderer = SvgChartRenderer::new(config.chart_path.clone());
        analyze_period(&storage, &renderer, period, &DefaultClock).await?;
    } else if let Some(date) = args.update {
        let date = parse_date_arg(&date, args.date_style)?;
        update_day(&storage, &mut prompter, date).await?;
    } else {
        let date = config.tracked_day(&DefaultClock);
        record_day(&storage, &mut prompter, &config, date).await?;
    }
    Ok(())
}

fn parse_date_arg(value: &str, style: DateStyle) -> Result<NaiveDate> {
    parse_day(value, Local::now(), style).map_err(|e| {
        Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()
    })
}
