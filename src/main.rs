use std::env;

#[tokio::main]
async fn main() {
    portfolio_estimator::logging::init_logging("info");

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = portfolio_estimator::api::run_http_server(port).await {
            tracing::error!(error = %e, "server error");
            std::process::exit(1);
        }
        return;
    }

    if let Err(msg) = portfolio_estimator::api::run_cli() {
        eprintln!("{msg}");
        std::process::exit(2);
    }
}
