use lockquiz::{app, config::Config, presentation::Presentation, AppResult};
use tokio::io::BufReader;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = Config::load(std::env::args().nth(1))?;

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_level(config.log_level))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(url = %config.url, "Opening presentation...");
    let mut presentation = Presentation::open(&config.url);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    app::run(&mut presentation, stdin, &mut stdout, config.tick).await
}
