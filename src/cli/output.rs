//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{DocwalkArgs, OutputFormat};
use crate::error::Result;
use crate::search::ScoredDocument;

/// Result structure for the weight command.
#[derive(Debug, Serialize, Deserialize)]
pub struct WeightResult {
    pub calculator: String,
    pub parameters: String,
    pub first_step: f64,
    pub second_step: f64,
    pub score: f64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub hits: Vec<ScoredDocument>,
    pub total_hits: u32,
    pub duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &DocwalkArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &DocwalkArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    if std::any::type_name::<T>().contains("SearchResults") {
        output_search_results_human(&value, args)
    } else {
        output_generic_human(&value, args)
    }
}

/// Output search results in human format.
fn output_search_results_human(value: &serde_json::Value, args: &DocwalkArgs) -> Result<()> {
    if let Some(obj) = value.as_object()
        && let Some(hits) = obj.get("hits").and_then(|h| h.as_array())
    {
        if let Some(query) = obj.get("query").and_then(|q| q.as_str()) {
            println!("Query: {query}");
        }
        println!("Search Results:");
        println!("═══════════════");

        for (i, hit) in hits.iter().enumerate() {
            println!();
            println!(
                "Result {}: document {} (Score: {:.3})",
                i + 1,
                hit.get("id").and_then(|d| d.as_u64()).unwrap_or(0),
                hit.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0)
            );
            println!("─────────────");
            if let Some(tf) = hit.get("term_frequency").and_then(|t| t.as_u64()) {
                println!("term frequency: {tf}");
            }
            if let Some(length) = hit.get("document_length").and_then(|l| l.as_u64()) {
                println!("document length: {length}");
            }
            if args.verbosity() > 1
                && let Some(occurrences) = hit.get("occurrences").and_then(|o| o.as_array())
            {
                let spans: Vec<String> = occurrences
                    .iter()
                    .filter_map(|o| {
                        let location = o.get("location")?.as_u64()?;
                        let length = o.get("length")?.as_u64()?;
                        Some(format!("{location}+{length}"))
                    })
                    .collect();
                println!("occurrences: {}", spans.join(", "));
            }
        }

        println!();

        if let Some(total) = obj.get("total_hits").and_then(|t| t.as_u64()) {
            println!("Total hits: {total}");
        }

        if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
            println!("Search time: {duration}ms");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value, _args: &DocwalkArgs) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &DocwalkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_u64() && !n.is_i64() => format!("{f:.6}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
