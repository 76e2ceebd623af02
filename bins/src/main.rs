use ai::Ai;
use chrono::Local;
use env::Env;
use eyre::{bail, Context as _};
use ledger::{service::demo, Ledger};
use log::info;

const DEFAULT_DEMO_DAYS: u64 = 365;
const DEMO_SEED: u64 = 42;

#[derive(Debug, PartialEq)]
enum Command {
    Serve,
    Seed,
    DemoCsv { days: u64 },
}

fn parse_command(mut args: impl Iterator<Item = String>) -> eyre::Result<Command> {
    match args.next().as_deref() {
        None | Some("serve") => Ok(Command::Serve),
        Some("seed") => Ok(Command::Seed),
        Some("demo-csv") => {
            let days = args
                .next()
                .map(|days| days.parse::<u64>())
                .transpose()
                .context("days must be a positive number")?
                .unwrap_or(DEFAULT_DEMO_DAYS);
            Ok(Command::DemoCsv { days })
        }
        Some(other) => bail!("Unknown command '{}'. Use serve, seed or demo-csv [days]", other),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let command = parse_command(std::env::args().skip(1))?;
    if let Command::DemoCsv { days } = command {
        let rows = demo::demo_rows(Local::now().date_naive(), days, DEMO_SEED)?;
        print!("{}", demo::demo_csv(&rows)?);
        return Ok(());
    }

    let env = Env::load()?;
    pretty_env_logger::formatted_builder()
        .parse_filters(env.rust_log())
        .init();
    info!("connecting to mongo");
    let storage = storage::Storage::new(env.mongo_url(), env.mongo_db())
        .await
        .context("Failed to create storage")?;
    info!("creating ledger");
    let ai = Ai::new(
        env.ai_base_url().to_string(),
        env.groq_api_key().to_string(),
        env.ai_model().to_string(),
    );
    info!("using AI model {}", ai.model());
    let ledger = Ledger::new(storage, ai);

    match command {
        Command::Seed => {
            let mut session = ledger.db.start_session().await?;
            let count = ledger.factors.seed(&mut session).await?;
            info!("{} factors in place", count);
        }
        _ => {
            info!("Starting api...");
            api::serve(ledger, env).await?;
        }
    }
    Ok(())
}
