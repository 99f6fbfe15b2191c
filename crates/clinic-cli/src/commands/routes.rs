use crate::console::Console;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clinic_guards::{GateDecision, RouteTable};
use serde_json::json;

fn decision_label(decision: GateDecision) -> &'static str {
    match decision {
        GateDecision::Proceed => "proceed",
        GateDecision::Pending => "pending",
        GateDecision::RedirectToLogin => "login",
        GateDecision::RedirectToUnauthorized => "unauthorized",
    }
}

/// Run the console's route guards against the stored session.
pub async fn can_open(console: &Console, route: &str, format: &OutputFormat) -> Result<()> {
    let state = console.auth.bootstrap().await?;
    let nav = RouteTable::console().navigate(route, &state);

    match format {
        OutputFormat::Json => output::print_json(&json!({
            "route": route,
            "matched": nav.route.path,
            "fallback": nav.fallback,
            "decision": decision_label(nav.decision),
            "destination": nav.destination(),
        })),
        OutputFormat::Text => {
            let message = match nav.decision {
                GateDecision::Proceed if nav.fallback => {
                    format!("No screen at {}, you would land on {}", route, nav.destination())
                }
                GateDecision::Proceed => format!("Allowed: {}", nav.route.path),
                GateDecision::Pending => "Session is still loading".to_string(),
                GateDecision::RedirectToLogin => {
                    format!("Not logged in: {} redirects to {}", route, nav.destination())
                }
                GateDecision::RedirectToUnauthorized => {
                    format!("Not permitted: {} redirects to {}", route, nav.destination())
                }
            };
            println!("{}", message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_labels_are_distinct() {
        let labels = [
            GateDecision::Proceed,
            GateDecision::Pending,
            GateDecision::RedirectToLogin,
            GateDecision::RedirectToUnauthorized,
        ]
        .map(decision_label);
        for (i, label) in labels.iter().enumerate() {
            assert!(!labels[i + 1..].contains(label));
        }
    }
}
