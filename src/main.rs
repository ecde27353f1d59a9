use app::{create_app, create_weather_source};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use config::RangeConfig;
use std::net::SocketAddr;
use std::process::ExitCode;

mod app;
mod config;
mod error;
mod models;
mod routes;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with the ranges the weather is generated from.
    #[arg(long, env = "WEATHER_CONFIG", default_value = "weather.toml")]
    config: String,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(short, long, env = "KEY_FILE_PATH", requires = "cert_file_path")]
    key_file_path: Option<String>,

    #[arg(short, long, env = "CERT_FILE_PATH", requires = "key_file_path")]
    cert_file_path: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let config = match RangeConfig::load(&args.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Failed to load configuration from {}: {}", args.config, error);
            return ExitCode::FAILURE;
        }
    };

    let app = create_app(create_weather_source(config));
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    log::info!("listening on {}", addr);
    let served = if let (Some(key_file_path), Some(cert_file_path)) =
        (args.key_file_path, args.cert_file_path)
    {
        log::info!(
            "using tls with key file {} and cert file {}",
            key_file_path,
            cert_file_path
        );
        match RustlsConfig::from_pem_file(cert_file_path, key_file_path).await {
            Ok(tls) => {
                axum_server::bind_rustls(addr, tls)
                    .serve(app.into_make_service())
                    .await
            }
            Err(error) => Err(error),
        }
    } else {
        axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
    };

    if let Err(error) = served {
        log::error!("Server stopped: {}", error);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
