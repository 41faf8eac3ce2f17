// Bootstrap command implementation
// Seeds the owner and admin accounts plus the default PIX key

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::{InitReport, SetupCoordinator};
use crate::types::internal::context::RequestContext;

/// Seed the system from the CLI, generating any missing passwords
///
/// Generated credentials are printed once and never stored in plain text.
pub async fn bootstrap_system(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== PIX Storefront Bootstrap ===\n");

    let ctx = RequestContext::for_cli("bootstrap");
    let coordinator = SetupCoordinator::new(app_data);
    let report = coordinator.initialize(&ctx, true).await?;

    print!("{}", render_report(&report));

    Ok(())
}

fn render_report(report: &InitReport) -> String {
    if report.created.is_empty() {
        return "Nothing to do: accounts and settings already exist.\n".to_string();
    }

    let mut out = String::new();
    for item in &report.created {
        out.push_str(&format!("  created {}\n", item));
    }

    if !report.generated_credentials.is_empty() {
        out.push_str("\nGenerated credentials (shown once, store them now):\n");
        for (username, password) in &report.generated_credentials {
            out.push_str(&format!("  {}: {}\n", username, password));
        }
    }

    out
}
