//! Command-line interface for the farm API.
//!
//! Queries or controls a running API over HTTP JSON-RPC.

use std::env;

use anyhow::Result;

use viner_api::api_client;

#[tokio::main]
async fn main() -> Result<()> {
    viner_api::tracing::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: viner-cli <command>");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  stat      Show farm status");
        eprintln!("  stat1     Print the raw viner_getstat1 fields");
        eprintln!("  restart   Restart mining (server must not be readonly)");
        eprintln!("  reboot    Send a reboot request (acknowledged, no effect)");
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  VINER_API_URL    API base URL (default: http://127.0.0.1:3333)");
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "stat" => cmd_stat().await?,
        "stat1" => cmd_stat1().await?,
        "restart" => cmd_restart().await?,
        "reboot" => cmd_reboot().await?,
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Run without arguments to see usage.");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Build an API client, honoring VINER_API_URL if set.
fn make_client() -> api_client::Client {
    match env::var("VINER_API_URL") {
        Ok(url) => api_client::Client::with_base_url(url),
        Err(_) => api_client::Client::new(),
    }
}

/// Print a summary of the current farm state.
async fn cmd_stat() -> Result<()> {
    let client = make_client();
    let stat = client.get_stat_hr().await?;

    println!("Version:  {}", stat.version);
    println!("Uptime:   {} min", stat.runtime);
    println!("Hashrate: {} H/s", stat.ethvashrate);
    println!(
        "Shares:   {} accepted, {} rejected, {} invalid",
        stat.ethshares, stat.ethrejected, stat.ethinvalid
    );
    println!("Pool:     {}", stat.pooladdrs);

    if stat.ethvashrates.is_empty() {
        println!("Devices: (none)");
    } else {
        println!("Devices:");
        for (i, rate) in stat.ethvashrates.iter().enumerate() {
            print!("  {i}: {rate} H/s");
            if let (Some(temp), Some(fan)) = (stat.temperatures.get(i), stat.fanpercentages.get(i)) {
                print!(", {temp} C, fan {fan}%");
            }
            if let Some(power) = stat.powerusages.get(i) {
                print!(", {power:.0} W");
            }
            println!();
        }
    }

    Ok(())
}

async fn cmd_stat1() -> Result<()> {
    let client = make_client();
    let stat = client.get_stat1().await?;
    for (i, field) in stat.0.iter().enumerate() {
        println!("{i}: {field}");
    }
    Ok(())
}

async fn cmd_restart() -> Result<()> {
    make_client().restart().await?;
    println!("Restart requested.");
    Ok(())
}

async fn cmd_reboot() -> Result<()> {
    make_client().reboot().await?;
    println!("Reboot acknowledged.");
    Ok(())
}
