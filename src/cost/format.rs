//! Human-readable cost output.

use std::fmt;

use super::breakdown::CostBreakdown;

pub const DEFAULT_DECIMALS: usize = 6;

/// `0.5` with 2 decimals is `$0.50`.
pub fn format_cost(value: f64, decimals: usize) -> String {
    format!("${:.*}", decimals, value)
}

/// One line per non-zero category, then the total.
pub fn format_breakdown(breakdown: &CostBreakdown, decimals: usize) -> String {
    let b = breakdown;
    let categories = [
        ("Input:", b.input),
        ("Cache Read:", b.cache_read),
        ("Cache Write:", b.cache_write),
        ("Output:", b.output),
        ("Reasoning:", b.reasoning),
        ("Web Search:", b.web_search),
        ("Google Maps:", b.google_maps),
        ("X Search:", b.x_search),
        ("Code Exec:", b.code_execution),
        ("Doc Search:", b.document_search),
        ("Collections:", b.collections_search),
        ("Image Gen:", b.image_generation),
    ];

    let mut lines = Vec::new();
    if b.is_long_context {
        lines.push("(Long context pricing applied)".to_string());
    }
    for (label, value) in categories {
        if value > 0.0 {
            lines.push(line(label, value, decimals));
        }
    }
    lines.push(line("Total:", b.total, decimals));
    lines.join("\n")
}

fn line(label: &str, value: f64, decimals: usize) -> String {
    format!("{:<14}{}", label, format_cost(value, decimals))
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_breakdown(self, DEFAULT_DECIMALS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0, 6), "$0.000000");
        assert_eq!(format_cost(3.85, 2), "$3.85");
        assert_eq!(format_cost(0.056, 4), "$0.0560");
    }

    #[test]
    fn test_format_breakdown_order_and_skips() {
        let b = CostBreakdown {
            input: 2.0,
            output: 1.6,
            cache_read: 0.25,
            total: 3.85,
            ..Default::default()
        };
        assert_eq!(
            format_breakdown(&b, 2),
            "Input:        $2.00\nCache Read:   $0.25\nOutput:       $1.60\nTotal:        $3.85"
        );
    }

    #[test]
    fn test_long_context_note() {
        let b = CostBreakdown {
            input: 1.2,
            total: 1.2,
            is_long_context: true,
            ..Default::default()
        };
        let text = b.to_string();
        assert!(text.starts_with("(Long context pricing applied)\n"));
        assert!(text.ends_with("Total:        $1.200000"));
    }

    #[test]
    fn test_empty_prints_total_only() {
        assert_eq!(CostBreakdown::empty().to_string(), "Total:        $0.000000");
    }
}
