//! Human-readable and JSON rendering of turns and statistics.

use std::time::Duration;

use serde::Serialize;

use streamchat_api::ModelInfo;
use streamchat_chat::Turn;
use streamchat_stream::{StreamStats, TotalUsage};

/// Render a duration rounded to whole milliseconds, e.g. `350ms`, `1.25s`,
/// `2m3.5s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = (duration.as_micros() + 500) / 1000;
    if millis == 0 {
        return "0s".to_string();
    }
    if millis < 1000 {
        return format!("{}ms", millis);
    }

    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;
    let fraction = millis % 1000;

    let mut seconds_part = seconds.to_string();
    if fraction > 0 {
        let digits = format!("{:03}", fraction);
        seconds_part.push('.');
        seconds_part.push_str(digits.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds_part)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds_part)
    } else {
        format!("{}s", seconds_part)
    }
}

/// Token and time lines printed after each response
pub fn format_token_usage(stats: &StreamStats) -> String {
    let mut out = format!(
        "Tokens: Input {} | Output {} | Total {}",
        stats.input_tokens,
        stats.output_tokens,
        stats.total_tokens()
    );

    if !stats.elapsed.is_zero() {
        if stats.has_segment_breakdown() {
            out.push_str(&format!(
                "\nTime: Thinking {} | Response {} | Total {}",
                format_duration(stats.thinking_time),
                format_duration(stats.response_time),
                format_duration(stats.segment_time())
            ));
        } else {
            out.push_str(&format!("\nTime: {}", format_duration(stats.elapsed)));
        }
    }
    out
}

pub fn format_total_usage(totals: &TotalUsage) -> String {
    format!(
        "Total tokens used: Input {} | Output {} | Combined {}",
        totals.input_tokens,
        totals.output_tokens,
        totals.combined()
    )
}

#[derive(Debug, Serialize)]
struct TokenReport {
    input: u64,
    output: u64,
    total: u64,
}

#[derive(Debug, Serialize)]
struct TimeReport {
    thinking_ms: u128,
    response_ms: u128,
    total_ms: u128,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    tokens: TokenReport,
    time: TimeReport,
}

/// One turn as printed by `--json`
#[derive(Debug, Serialize)]
pub struct TurnReport {
    response: String,
    thinking: String,
    stats: StatsReport,
}

impl TurnReport {
    pub fn new(turn: &Turn) -> Self {
        let stats = &turn.stats;
        Self {
            response: turn.answer(),
            thinking: turn.thinking(),
            stats: StatsReport {
                tokens: TokenReport {
                    input: stats.input_tokens,
                    output: stats.output_tokens,
                    total: stats.total_tokens(),
                },
                time: TimeReport {
                    thinking_ms: stats.thinking_time.as_millis(),
                    response_ms: stats.response_time.as_millis(),
                    total_ms: stats.segment_time().as_millis(),
                },
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn format_model_info(info: &ModelInfo) -> serde_json::Result<String> {
    let details = serde_json::to_string_pretty(&info.details)?;
    Ok(format!(
        "Model Information:\n  Name: {}\n  Size: {} MB\n  Family: {}\n  Parameters: {}\n  Quantization: {}\n  API Endpoint: {}\n{}",
        info.name,
        info.size_mb,
        info.family,
        info.parameter_size,
        info.quantization,
        info.api_endpoint,
        details
    ))
}

pub fn format_missing_model(model: &str, available: &[String]) -> String {
    let mut out = format!("Model '{}' not found on the server.\nAvailable models:", model);
    for name in available {
        out.push_str(&format!("\n  - {}", name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn stats(thinking: u64, response: u64, elapsed: u64) -> StreamStats {
        StreamStats {
            input_tokens: 12,
            output_tokens: 30,
            thinking_time: ms(thinking),
            response_time: ms(response),
            elapsed: ms(elapsed),
            open_segment: None,
        }
    }

    #[test]
    fn durations_round_to_milliseconds() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_micros(400)), "0s");
        assert_eq!(format_duration(Duration::from_micros(350_600)), "351ms");
        assert_eq!(format_duration(ms(1000)), "1s");
        assert_eq!(format_duration(ms(1250)), "1.25s");
        assert_eq!(format_duration(ms(123_500)), "2m3.5s");
        assert_eq!(format_duration(ms(3_600_000 + 61_000)), "1h1m1s");
    }

    #[test]
    fn usage_with_segment_breakdown() {
        assert_eq!(
            format_token_usage(&stats(300, 1200, 1510)),
            "Tokens: Input 12 | Output 30 | Total 42\nTime: Thinking 300ms | Response 1.2s | Total 1.5s"
        );
    }

    #[test]
    fn usage_without_breakdown_shows_elapsed() {
        assert_eq!(
            format_token_usage(&stats(0, 0, 80)),
            "Tokens: Input 12 | Output 30 | Total 42\nTime: 80ms"
        );
    }

    #[test]
    fn usage_without_timing_has_no_time_line() {
        assert_eq!(format_token_usage(&stats(0, 0, 0)), "Tokens: Input 12 | Output 30 | Total 42");
    }

    #[test]
    fn total_usage_line() {
        let totals = TotalUsage { input_tokens: 60, output_tokens: 21 };
        assert_eq!(format_total_usage(&totals), "Total tokens used: Input 60 | Output 21 | Combined 81");
    }

    #[test]
    fn json_report_splits_thinking_from_response() {
        let turn = Turn {
            full_response: "<think>plan</think>\n\nDone.".to_string(),
            stats: stats(300, 75, 385),
        };
        let json: serde_json::Value =
            serde_json::from_str(&TurnReport::new(&turn).to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "response": "Done.",
                "thinking": "<think>plan</think>",
                "stats": {
                    "tokens": { "input": 12, "output": 30, "total": 42 },
                    "time": { "thinking_ms": 300, "response_ms": 75, "total_ms": 375 }
                }
            })
        );
    }

    #[test]
    fn missing_model_lists_alternatives() {
        let text = format_missing_model("qwen3:8b", &["llama3:8b".to_string(), "mistral".to_string()]);
        assert_eq!(
            text,
            "Model 'qwen3:8b' not found on the server.\nAvailable models:\n  - llama3:8b\n  - mistral"
        );
    }

    #[test]
    fn model_info_without_details_prints_null() {
        let info = ModelInfo {
            name: "qwen3:8b".into(),
            size_mb: 5000,
            family: "Unknown".into(),
            parameter_size: "Unknown".into(),
            quantization: "Unknown".into(),
            api_endpoint: "http://localhost:11434".into(),
            details: None,
        };
        let text = format_model_info(&info).unwrap();
        assert!(text.starts_with("Model Information:\n  Name: qwen3:8b\n  Size: 5000 MB"));
        assert!(text.ends_with("API Endpoint: http://localhost:11434\nnull"));
    }
}
