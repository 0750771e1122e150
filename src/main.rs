use dotenv::dotenv;
use minebot::game::Game;
use minebot::infra::{BotConfig, DefaultObserver};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minebot=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let config = BotConfig::from_env()?;
    tracing::info!(
        "Task quota: build {}, gather {}, rest {}",
        config.fleet.task_quota.build,
        config.fleet.task_quota.gather,
        config.fleet.task_quota.rest
    );

    let mut game = Game::new(config, DefaultObserver)?;
    let summary = game.run()?;
    tracing::info!("{:?}", summary);

    Ok(())
}
