//! Cost Engine Tests
//!
//! End-to-end checks of pricing resolution, the cost engine, breakdown
//! algebra, trackers and price table loading through the public API.
//!
//! Run: cargo nextest run --test cost_tests

use std::sync::Arc;

use llm_cost::{
    AddUsageOptions, CostBreakdown, CostRequest, CostTracker, InputTokenDetails,
    LongContextPricing, MultiModelTracker, OutputTokenDetails, PricePolicy, PriceTable,
    RequestCounts, Usage,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn usage(no_cache: u64, cache_read: u64, cache_write: u64, text: u64, reasoning: u64) -> Usage {
    Usage::default()
        .with_input_details(InputTokenDetails {
            no_cache_tokens: Some(no_cache),
            cache_read_tokens: Some(cache_read),
            cache_write_tokens: Some(cache_write),
        })
        .with_output_details(OutputTokenDetails {
            text_tokens: Some(text),
            reasoning_tokens: Some(reasoning),
        })
}

fn table() -> PriceTable {
    PriceTable::builder()
        .model("acme", "acme-chat", PricePolicy::new(2.0, 8.0).cache_read(0.5))
        .model(
            "acme",
            "acme-long",
            PricePolicy::new(3.0, 15.0)
                .cache_read(0.3)
                .cache_write(3.75)
                .long_context(LongContextPricing::new(6.0).output(22.5)),
        )
        .model(
            "acme",
            "acme-search",
            PricePolicy::new(0.15, 0.6)
                .web_search(25.0)
                .web_search_tokens(8_000),
        )
        .model(
            "acme",
            "acme-image",
            PricePolicy::new(0.0, 0.0)
                .image(0.04)
                .image_size("1024x1024", 0.04)
                .image_size("hd-1024x1024", 0.08),
        )
        .build()
        .unwrap()
}

// =============================================================================
// Cost engine
// =============================================================================

mod engine_tests {
    use super::*;

    #[test]
    fn test_category_costs() {
        init_tracing();
        let cost = table()
            .calculate(&CostRequest::new("acme-chat", usage(1_000_000, 500_000, 0, 200_000, 0)))
            .unwrap();

        assert!(close(cost.input, 2.0));
        assert!(close(cost.cache_read, 0.25));
        assert!(close(cost.output, 1.6));
        assert!(close(cost.total, 3.85));
        assert_eq!(cost.currency.code(), "USD");
    }

    #[test]
    fn test_total_matches_categories() {
        let cost = table()
            .calculate(
                &CostRequest::new("acme-long", usage(150_000, 40_000, 10_000, 3_000, 1_234))
                    .web_search(3),
            )
            .unwrap();
        assert!((cost.total - cost.category_sum()).abs() < 1e-5);
    }

    #[test]
    fn test_long_context_boundary() {
        let t = table();
        let at = t
            .calculate(&CostRequest::new("acme-long", Usage::new(200_000, 0)))
            .unwrap();
        assert!(!at.is_long_context);

        let over = t
            .calculate(&CostRequest::new("acme-long", Usage::new(200_001, 1_000)))
            .unwrap();
        assert!(over.is_long_context);
        assert!(close(over.output, 0.0225));
    }

    #[test]
    fn test_web_search_phantom_tokens_use_input_rate() {
        let cost = table()
            .calculate(&CostRequest::new("acme-search", Usage::default()).web_search(2))
            .unwrap();
        assert!(close(cost.web_search, 0.0524));
    }

    #[test]
    fn test_web_search_five_requests_at_ten_per_thousand() {
        let cost = table()
            .calculate(
                &CostRequest::new("acme-search", Usage::default())
                    .pricing(PricePolicy::new(0.15, 0.6).web_search(10.0).web_search_tokens(8_000))
                    .web_search(5),
            )
            .unwrap();
        assert!(close(cost.web_search, 0.056));
    }

    #[test]
    fn test_global_table_unknown_model() {
        let err = llm_cost::calculate_cost(&CostRequest::new("not-a-real-model", Usage::new(1, 1)))
            .unwrap_err();
        assert!(err.is_unknown_model());
    }

    #[test]
    fn test_image_size_fallback() {
        let t = table();
        let hd = t
            .calculate(
                &CostRequest::new("acme-image", Usage::default())
                    .images(3)
                    .image_size("hd-1024x1024"),
            )
            .unwrap();
        assert!(close(hd.image_generation, 0.24));

        let unlisted = t
            .calculate(
                &CostRequest::new("acme-image", Usage::default())
                    .images(2)
                    .image_size("4096x4096"),
            )
            .unwrap();
        assert!(close(unlisted.image_generation, 0.08));
    }

    #[test]
    fn test_unknown_model_error() {
        let err = table()
            .calculate(&CostRequest::new("nobody-model", Usage::new(1, 1)))
            .unwrap_err();
        assert!(err.is_unknown_model());
    }

    #[test]
    fn test_normalized_lookup() {
        init_tracing();
        let cost = table()
            .calculate(&CostRequest::new("acme-chat-2025-01-31", Usage::new(1_000_000, 0)))
            .unwrap();
        assert!(close(cost.total, 2.0));
    }

    #[test]
    fn test_builtin_models_price() {
        let cost = llm_cost::calculate_cost(&CostRequest::new(
            "gemini-2.5-pro",
            Usage::new(300_000, 0),
        ))
        .unwrap();
        // above 200k input: long-context input rate of $2.50/M
        assert!(cost.is_long_context);
        assert!(close(cost.input, 0.75));
    }
}

// =============================================================================
// Breakdown algebra
// =============================================================================

mod algebra_tests {
    use super::*;

    fn costs() -> Vec<CostBreakdown> {
        let t = table();
        vec![
            t.calculate(&CostRequest::new("acme-chat", Usage::new(123_457, 9_876)))
                .unwrap(),
            t.calculate(&CostRequest::new("acme-long", Usage::new(250_000, 333)))
                .unwrap(),
            t.calculate(&CostRequest::new("acme-search", Usage::new(77, 3)).web_search(1))
                .unwrap(),
        ]
    }

    #[test]
    fn test_fold_order_independent() {
        let c = costs();
        let forward: CostBreakdown = c.iter().sum();
        let backward: CostBreakdown = c.iter().rev().sum();
        assert_eq!(forward.rounded(), backward.rounded());
        assert!(forward.is_long_context);
    }

    #[test]
    fn test_scale_then_round() {
        let c = costs()[0];
        let doubled = (c * 2.0).rounded();
        assert!((doubled.total - (c + c).rounded().total).abs() < 1e-9);
        assert_eq!(doubled.rounded(), doubled);
    }
}

// =============================================================================
// Trackers
// =============================================================================

mod tracker_tests {
    use super::*;

    #[test]
    fn test_tracker_equals_single_call() {
        let t = Arc::new(table());
        let mut tracker = CostTracker::new("acme-chat").with_table(Arc::clone(&t));
        for _ in 0..3 {
            tracker.add_usage(&usage(500_000, 0, 0, 0, 0));
        }

        let tracked = tracker.total_cost().unwrap();
        let single = t
            .calculate(&CostRequest::new("acme-chat", usage(1_500_000, 0, 0, 0, 0)))
            .unwrap();
        assert_eq!(tracked, single);
        assert!(close(tracked.input, 3.0));
    }

    #[test]
    fn test_multi_tracker_total_is_sum_of_models() {
        init_tracing();
        let t = Arc::new(table());
        let mut tracker = MultiModelTracker::new().with_table(Arc::clone(&t));
        let opts = AddUsageOptions::default();

        tracker.add("acme-chat", &Usage::new(10_000, 500), &opts).unwrap();
        tracker.add("acme-long", &Usage::new(20_000, 700), &opts).unwrap();
        tracker
            .add(
                "acme-search",
                &Usage::new(1_000, 10),
                &AddUsageOptions::new().requests(RequestCounts {
                    web_search: 4,
                    ..Default::default()
                }),
            )
            .unwrap();

        let sum: CostBreakdown = tracker
            .all_costs()
            .unwrap()
            .iter()
            .map(|s| s.cost)
            .sum();
        assert_eq!(tracker.total().unwrap(), sum.rounded());
        assert_eq!(tracker.total_request_count(), 3);
    }

    #[test]
    fn test_reset_model_vs_reset() {
        let mut tracker = MultiModelTracker::new().with_table(Arc::new(table()));
        let opts = AddUsageOptions::default();
        tracker.add("acme-chat", &Usage::new(10, 10), &opts).unwrap();
        tracker.add("acme-long", &Usage::new(10, 10), &opts).unwrap();

        tracker.reset_model("acme-chat");
        assert_eq!(tracker.models(), &["acme-long".to_string()]);
        assert!(tracker.model("acme-chat").unwrap().is_none());

        tracker.reset();
        assert!(tracker.models().is_empty());
    }
}

// =============================================================================
// Price table loading
// =============================================================================

mod loading_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_yaml_and_merge_over_builtins() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.yaml");
        tokio::fs::write(
            &path,
            "anthropic:\n  claude-sonnet-4-5:\n    input_per_mtok: 1.0\n    output_per_mtok: 1.0\n",
        )
        .await
        .unwrap();

        let custom = PriceTable::load(&path).await.unwrap();
        let merged = PriceTable::builder()
            .with_builtins()
            .merge(&custom)
            .build()
            .unwrap();

        let cost = merged
            .calculate(&CostRequest::new("claude-sonnet-4-5", Usage::new(1_000_000, 1_000_000)))
            .unwrap();
        assert!(close(cost.total, 2.0));
        assert!(merged.resolve("gpt-4o").is_some());
    }

    #[test]
    fn test_json_table_blocking_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        std::fs::write(
            &path,
            r#"{"acme": {"acme-x": {"input_per_mtok": 1.5, "output_per_mtok": 3.0}}}"#,
        )
        .unwrap();

        let t = tokio_test::block_on(PriceTable::load(&path)).unwrap();
        assert_eq!(t.get("acme", "acme-x").unwrap().output_per_mtok, 3.0);
    }
}
