//! `backstop check` – one-shot connectivity check.

use anyhow::Result;
use backstop_core::connectivity::ConnectivityMonitor;

pub async fn run_check(monitor: &ConnectivityMonitor) -> Result<()> {
    let online = monitor.check_now().await?;
    if online {
        println!("online");
        Ok(())
    } else {
        println!("offline");
        anyhow::bail!("connectivity check failed")
    }
}
