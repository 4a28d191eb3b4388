use foodgram::{
    config::Config,
    routes::{context::Context, filters::routes},
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info,sqlx=warn");
    env_logger::Builder::from_env(env).init();

    if let Err(e) = run().await {
        log::error!("> {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tokio::fs::create_dir_all(&config.media_root).await?;

    let ctx = Context::new(pool, &config);

    log::info!("> Listening on {}", config.bind_address);
    warp::serve(routes(ctx)).run(config.bind_address).await;

    Ok(())
}
