use anyhow::{Context, Result};
use clap::Parser;

use gce_lifecycle::gcp::gce::{ComputeApi, ComputeClient, GCE_API_BASE, Instance};
use gce_lifecycle::lifecycle::DEFAULT_ZONE;

#[derive(Parser, Debug)]
#[command(name = "gce_list_instances", about = "List Compute Engine instances in one zone")]
struct Args {
    #[arg(long)]
    project: String,

    #[arg(long, default_value = DEFAULT_ZONE)]
    zone: String,

    #[arg(long = "api_base", default_value = GCE_API_BASE)]
    api_base: String,

    #[arg(
        long = "access_token",
        env = "GOOGLE_OAUTH_ACCESS_TOKEN",
        hide_env_values = true
    )]
    access_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    gce_lifecycle::init_logging();
    let args = Args::parse();

    let client = ComputeClient::new(&args.api_base, args.access_token.clone())
        .context("Failed to build HTTP client")?;

    let instances = match client.list_instances(&args.project, &args.zone).await {
        Ok(instances) => instances,
        Err(e) => {
            eprintln!("Failed to list instances: {}", e);
            std::process::exit(1);
        }
    };

    match instances {
        None => println!("No instances in {}/{}", args.project, args.zone),
        Some(list) => {
            let rows = list.iter().map(|i| row(i, &args.zone)).collect::<Vec<_>>();
            print_table(
                &["Status", "Name", "Machine Type", "Zone", "External IP"],
                &rows,
            );
        }
    }

    Ok(())
}

fn row(instance: &Instance, zone: &str) -> [String; 5] {
    [
        instance.status.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
        instance.name.clone(),
        instance
            .machine_type
            .as_deref()
            .map(last_segment)
            .unwrap_or_default()
            .to_string(),
        instance
            .zone
            .as_deref()
            .map(last_segment)
            .unwrap_or(zone)
            .to_string(),
        instance.external_ip().unwrap_or("-").to_string(),
    ]
}

fn last_segment(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

fn print_table(headers: &[&str; 5], rows: &[[String; 5]]) {
    let mut widths = [0usize; 5];
    for (w, h) in widths.iter_mut().zip(headers) {
        *w = h.chars().count();
    }
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        let padded = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:w$}", c, w = w))
            .collect::<Vec<_>>();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.iter().map(|h| h.to_string()).collect());
    line(widths.iter().map(|w| "-".repeat(*w)).collect());
    for row in rows {
        line(row.to_vec());
    }
}
