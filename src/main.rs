use clap::Parser;
use log::{error, LevelFilter};
use pretty_env_logger::env_logger::Target;
use std::process;
use tree_serve::server::Server;
use tree_serve::server_config::ServerConfigBuilder;

#[derive(Parser, Debug)]
#[command(name = "tree_serve")]
#[command(about = "Serve a directory tree over HTTP")]
#[command(version)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Directory to serve
    root: String,
}

fn main() {
    // usage errors exit with 0, existing launch scripts rely on it
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(0);
        }
    };

    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Stdout)
        .init();

    let config = ServerConfigBuilder::new()
        .root(&cli.root)
        .port(cli.port)
        .get();

    let server = match Server::new(Some(config)) {
        Ok(server) => server,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    if let Err(err) = server.run() {
        error!("Server stopped: {err}");
        process::exit(1);
    }
}
