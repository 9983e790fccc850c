//! One-shot reply command.

use anyhow::{Context, Result};
use parley_core::reply::selector::ResponseSelector;
use parley_types::config::ParleyConfig;
use serde_json::Value;

use super::build_selector;

/// Reply to one message and print the result.
///
/// # Examples
///
/// ```bash
/// parley respond "hi there" --analysis '{"intent":{"primary":"greeting"}}'
/// parley respond "what's your name?" --json
/// ```
pub fn respond(
    config: &ParleyConfig,
    message: &str,
    analysis: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut selector = build_selector(config);
    let reply = reply_once(&mut selector, message, analysis)?;

    if json {
        let out = serde_json::json!({ "reply": reply });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{reply}");
    }
    Ok(())
}

/// Decode the `--analysis` argument and produce a reply.
///
/// Text that is not JSON at all is a usage error; JSON with the wrong shape
/// goes to the selector, which answers it with an apology.
pub fn reply_once(
    selector: &mut ResponseSelector,
    message: &str,
    analysis: Option<&str>,
) -> Result<String> {
    let analysis: Option<Value> = analysis
        .map(|raw| serde_json::from_str(raw))
        .transpose()
        .context("--analysis is not valid JSON")?;
    Ok(selector.generate_response_json(message, analysis.as_ref()))
}
