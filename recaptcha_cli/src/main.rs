mod config;
mod logger;

use crate::config::Config;
use log::info;
use recaptcha::{make_recaptcha_request, HttpsTransport, ReCaptchaTestValue};
use std::path::PathBuf;
use structopt::StructOpt;

const EXIT_REJECTED: i32 = 1;
const EXIT_CONFIG: i32 = 2;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "recaptcha-verify",
    about = "Verify a reCAPTCHA v2 response token against Google's siteverify endpoint"
)]
struct Args {
    /// TOML file with logger settings, the secret key and validator options
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Secret key; takes precedence over `secret` in the config file
    #[structopt(long)]
    secret: Option<String>,
    /// Response token produced by the reCAPTCHA widget
    #[structopt(long)]
    response: Option<String>,
    /// IP address of the user who solved the challenge
    #[structopt(long)]
    remoteip: Option<String>,
    /// Log more (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    std::process::exit(run(Args::from_args()).await);
}

async fn run(args: Args) -> i32 {
    let config = match args.config.as_deref().map(Config::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            eprintln!("{}", err);
            return EXIT_CONFIG;
        }
    };

    if let Err(err) = logger::init(&config.logger, args.verbose) {
        eprintln!("{}", err);
        return EXIT_CONFIG;
    }

    let options = match config.validator_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            return EXIT_CONFIG;
        }
    };

    let value = ReCaptchaTestValue {
        secret: args.secret.or(config.secret),
        response: args.response,
        remoteip: args.remoteip,
    };

    let (result, code) =
        match make_recaptcha_request(&HttpsTransport::new(), options, &value).await {
            Ok(result) => (result, 0),
            Err(rejection) => {
                info!("{}", rejection);
                (rejection.result, EXIT_REJECTED)
            }
        };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("could not serialize result: {}", err),
    }
    code
}
