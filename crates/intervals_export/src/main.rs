use std::io::Read;

use intervals_export::cli::{self, Envelope};

fn emit(envelope: &Envelope) {
    match serde_json::to_string(envelope) {
        Ok(line) => println!("{line}"),
        Err(_) => println!(r#"{{"ok":false,"error":"failed to serialize response"}}"#),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Configure logging from `INTERVALS_ICU_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    // The envelope owns stdout, so all logging goes to stderr.
    let log_env = std::env::var("INTERVALS_ICU_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        eprintln!("usage: intervals_export <command> [json-payload]");
        std::process::exit(2);
    };
    let payload = match args.next() {
        Some(inline) => inline,
        None => {
            let mut buf = String::new();
            if std::io::stdin().read_to_string(&mut buf).is_err() {
                buf.clear();
            }
            buf
        }
    };

    let config = match intervals_client::config::Config::resolve() {
        Ok(c) => c,
        Err(e) => {
            emit(&Envelope::failure(e.to_string()));
            std::process::exit(1);
        }
    };
    let client = intervals_client::http_client::ReqwestIntervalsClient::from_config(&config);

    match cli::run(&client, &command, &payload).await {
        Ok(data) => emit(&Envelope::success(data)),
        Err(e) => {
            emit(&Envelope::failure(e.to_string()));
            std::process::exit(1);
        }
    }
}
