//! Built-in price data.
//!
//! Published list prices at the time of writing. Providers are registered in
//! a fixed order, so a model id listed by two providers resolves to the later
//! one in the flat view.

use super::policy::{LongContextPricing, PricePolicy};
use super::table::PriceTable;

pub(crate) fn register_all(table: &mut PriceTable) {
    openai(table);
    anthropic(table);
    google(table);
    xai(table);
    deepseek(table);
    perplexity(table);
}

fn openai(table: &mut PriceTable) {
    let models = [
        ("gpt-5", PricePolicy::new(1.25, 10.0).cache_read(0.125)),
        ("gpt-5-mini", PricePolicy::new(0.25, 2.0).cache_read(0.025)),
        ("gpt-5-nano", PricePolicy::new(0.05, 0.4).cache_read(0.005)),
        ("gpt-4.1", PricePolicy::new(2.0, 8.0).cache_read(0.5)),
        ("gpt-4.1-mini", PricePolicy::new(0.4, 1.6).cache_read(0.1)),
        ("gpt-4.1-nano", PricePolicy::new(0.1, 0.4).cache_read(0.025)),
        ("gpt-4o", PricePolicy::new(2.5, 10.0).cache_read(1.25)),
        ("gpt-4o-mini", PricePolicy::new(0.15, 0.6).cache_read(0.075)),
        ("o3", PricePolicy::new(2.0, 8.0).cache_read(0.5)),
        ("o4-mini", PricePolicy::new(1.1, 4.4).cache_read(0.275)),
        (
            "gpt-4o-search-preview",
            PricePolicy::new(2.5, 10.0).web_search(25.0),
        ),
        (
            "dall-e-3",
            PricePolicy::new(0.0, 0.0)
                .image(0.04)
                .image_size("1024x1024", 0.04)
                .image_size("1024x1792", 0.08)
                .image_size("1792x1024", 0.08)
                .image_size("hd-1024x1024", 0.08)
                .image_size("hd-1024x1792", 0.12)
                .image_size("hd-1792x1024", 0.12),
        ),
    ];
    for (id, policy) in models {
        table.insert("openai", id, policy);
    }
}

fn anthropic(table: &mut PriceTable) {
    let sonnet = || {
        PricePolicy::new(3.0, 15.0)
            .cache_read(0.3)
            .cache_write(3.75)
            .long_context(
                LongContextPricing::new(6.0)
                    .output(22.5)
                    .cache_read(0.6)
                    .cache_write(7.5),
            )
    };

    let models = [
        ("claude-sonnet-4-5", sonnet()),
        ("claude-sonnet-4", sonnet()),
        (
            "claude-opus-4-5",
            PricePolicy::new(5.0, 25.0).cache_read(0.5).cache_write(6.25),
        ),
        (
            "claude-opus-4-1",
            PricePolicy::new(15.0, 75.0).cache_read(1.5).cache_write(18.75),
        ),
        (
            "claude-haiku-4-5",
            PricePolicy::new(1.0, 5.0).cache_read(0.1).cache_write(1.25),
        ),
        (
            "claude-3-7-sonnet",
            PricePolicy::new(3.0, 15.0).cache_read(0.3).cache_write(3.75),
        ),
        (
            "claude-3-5-haiku",
            PricePolicy::new(0.8, 4.0).cache_read(0.08).cache_write(1.0),
        ),
    ];
    for (id, policy) in models {
        table.insert("anthropic", id, policy);
    }
}

fn google(table: &mut PriceTable) {
    let models = [
        (
            "gemini-2.5-pro",
            PricePolicy::new(1.25, 10.0)
                .cache_read(0.125)
                .reasoning(10.0)
                .long_context(
                    LongContextPricing::new(2.5)
                        .output(15.0)
                        .cache_read(0.25)
                        .reasoning(15.0),
                )
                .web_search(35.0)
                .google_maps(7.0),
        ),
        (
            "gemini-2.5-flash",
            PricePolicy::new(0.3, 2.5)
                .cache_read(0.03)
                .reasoning(2.5)
                .web_search(35.0)
                .google_maps(7.0),
        ),
        (
            "gemini-2.5-flash-lite",
            PricePolicy::new(0.1, 0.4).cache_read(0.01).web_search(35.0),
        ),
        (
            "gemini-2.0-flash",
            PricePolicy::new(0.1, 0.4).cache_read(0.025).web_search(35.0),
        ),
        (
            "gemini-3-pro-image-preview",
            PricePolicy::new(2.0, 12.0)
                .image(0.05)
                .image_size("1024x1024", 0.134)
                .image_size("2048x2048", 0.24),
        ),
    ];
    for (id, policy) in models {
        table.insert("google", id, policy);
    }
}

fn xai(table: &mut PriceTable) {
    let tools = |policy: PricePolicy| {
        policy
            .web_search(5.0)
            .x_search(5.0)
            .code_execution(5.0)
            .document_search(5.0)
            .collections_search(2.5)
    };

    let fast = || {
        tools(
            PricePolicy::new(0.2, 0.5).cache_read(0.05).long_context(
                LongContextPricing::new(0.4)
                    .threshold(128_000)
                    .output(1.0),
            ),
        )
    };

    let models = [
        ("grok-4", tools(PricePolicy::new(3.0, 15.0).cache_read(0.75))),
        ("grok-4-fast-reasoning", fast()),
        ("grok-4-fast-non-reasoning", fast()),
        ("grok-3-mini", PricePolicy::new(0.3, 0.5).cache_read(0.075)),
        (
            "grok-2-image",
            PricePolicy::new(0.0, 0.0).image(0.07),
        ),
    ];
    for (id, policy) in models {
        table.insert("xai", id, policy);
    }
}

fn deepseek(table: &mut PriceTable) {
    table.insert(
        "deepseek",
        "deepseek-chat",
        PricePolicy::new(0.28, 0.42).cache_read(0.028),
    );
    table.insert(
        "deepseek",
        "deepseek-reasoner",
        PricePolicy::new(0.56, 2.19).cache_read(0.14).reasoning(2.19),
    );
}

fn perplexity(table: &mut PriceTable) {
    let models = [
        ("sonar", PricePolicy::new(1.0, 1.0).web_search(5.0)),
        ("sonar-pro", PricePolicy::new(3.0, 15.0).web_search(6.0)),
        (
            "sonar-reasoning",
            PricePolicy::new(1.0, 5.0).web_search(5.0),
        ),
        (
            "sonar-deep-research",
            PricePolicy::new(2.0, 8.0).reasoning(3.0).web_search(5.0),
        ),
    ];
    for (id, policy) in models {
        table.insert("perplexity", id, policy);
    }
}
