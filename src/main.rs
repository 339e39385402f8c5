use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = devgate::cli::Cli::parse();
    if let Err(e) = devgate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
