use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rtcstats_provision::{
    output, provision, rtcstats_table_schema, DeletionWait, DynamoTableAdmin, ProvisionConfig,
    ProvisionOptions, ProvisionOutcome,
};

/// Recreate the rtcstats metadata table in DynamoDB
#[derive(Parser, Debug)]
#[command(name = "rtcstats-init-dynamodb")]
#[command(version, about, long_about = "Recreate the rtcstats metadata table in DynamoDB.

Lists the existing tables, deletes the target table if it exists and
creates it again with the conferenceId/dumpId key schema and the
startDate secondary indexes. Table creation is requested but not awaited.

Environment variables:
  RTCSTATS_METADATA_TABLE - Table name (defaults to sessions)
  AWS_ENDPOINT_URL        - Custom endpoint (e.g., http://localhost:4566)
  AWS_REGION              - AWS region (defaults to us-east-1)
  AWS_PROFILE             - AWS profile to use for credentials
  RUST_LOG                - Log filter")]
struct Cli {
    /// Table name to provision
    #[arg(long, env = "RTCSTATS_METADATA_TABLE")]
    table_name: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom endpoint URL (LocalStack, DynamoDB Local)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Show the plan without deleting or creating anything
    #[arg(long)]
    dry_run: bool,

    /// Wait for the old table to be gone before creating the new one
    #[arg(long)]
    wait_for_deletion: bool,

    /// Silence the console summary
    #[arg(long)]
    silent: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtcstats_provision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProvisionConfig::new(cli.table_name, cli.region, cli.endpoint_url);
    let schema = rtcstats_table_schema(&config.table_name);
    schema.validate()?;

    if !cli.silent {
        output::print_target(&config.target_display(), &config.table_name);
    }

    let admin = DynamoTableAdmin::connect(&config).await;
    let options = ProvisionOptions {
        dry_run: cli.dry_run,
        wait_for_deletion: cli.wait_for_deletion.then(DeletionWait::default),
    };

    let outcome = provision(&admin, &schema, &options).await;

    if !cli.silent {
        if let ProvisionOutcome::Planned(plan) = &outcome {
            output::print_plan(plan, &schema);
        }
        output::print_outcome(&outcome);
    }

    Ok(())
}
