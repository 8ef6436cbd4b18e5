use anyhow::Result;
use clap::Parser;
use menstrual_health_qa::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("menstrual_health_qa=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
