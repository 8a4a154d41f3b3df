//! Set command implementation.
//!
//! Applies the same validation as the dashboard's setpoint form and sends
//! the values once. There is no retry and no read-back.

use anyhow::{Result, bail};
use demeter_core::{DemeterClient, SetpointForm, SetpointOutcome, VALIDATION_MESSAGE, setpoint};
use owo_colors::OwoColorize;

use crate::format::format_targets_text;

/// Arguments for the set command.
pub struct SetArgs<'a> {
    pub client: &'a DemeterClient,
    pub low_ph: &'a str,
    pub high_ph: &'a str,
    pub low_ec: &'a str,
    pub quiet: bool,
    pub no_color: bool,
}

pub async fn cmd_set(args: SetArgs<'_>) -> Result<()> {
    let SetArgs {
        client,
        low_ph,
        high_ph,
        low_ec,
        quiet,
        no_color,
    } = args;

    let form = SetpointForm::new(low_ph, high_ph, low_ec);
    let values = match form.validate() {
        Ok(values) => values,
        Err(e) => bail!("{} ({})", VALIDATION_MESSAGE, e),
    };

    if !quiet {
        eprintln!("Sending {} to {}", format_targets_text(&values), client.base_url());
    }

    let outcome = setpoint::submit(client, &values).await;
    match &outcome {
        SetpointOutcome::Accepted => {
            if !quiet {
                let msg = outcome.notification();
                if no_color {
                    println!("{}", msg);
                } else {
                    println!("{}", msg.green());
                }
            }
            Ok(())
        }
        SetpointOutcome::Rejected { status, message } => {
            bail!("{} (HTTP {}: {})", outcome.notification(), status, message)
        }
        SetpointOutcome::Failed(error) => bail!("{} ({})", outcome.notification(), error),
    }
}
