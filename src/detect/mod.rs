//! Auxiliary request detection from a generation's tool calls.
//!
//! Tool names are mapped to request kinds by a [`RequestClassifier`]. The
//! default [`NameListClassifier`] matches case-insensitively against known
//! tool names of the major providers and frameworks.

use serde::{Deserialize, Serialize};

use crate::cost::RequestCounts;
use crate::usage::{Usage, UsageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    WebSearch,
    GoogleMaps,
    XSearch,
    CodeExecution,
    DocumentSearch,
    CollectionsSearch,
    ImageGeneration,
}

impl RequestKind {
    /// Classification precedence when a name matches several kinds.
    pub const ALL: [RequestKind; 7] = [
        RequestKind::WebSearch,
        RequestKind::GoogleMaps,
        RequestKind::XSearch,
        RequestKind::CodeExecution,
        RequestKind::DocumentSearch,
        RequestKind::CollectionsSearch,
        RequestKind::ImageGeneration,
    ];

    pub fn default_tool_names(&self) -> &'static [&'static str] {
        match self {
            RequestKind::WebSearch => &[
                "web_search",
                "webSearch",
                "google_search",
                "googleSearch",
                "grounding",
                "web_search_preview",
                "tavily_search",
                "brave_search",
                "bing_search",
                "duckduckgo_search",
            ],
            RequestKind::GoogleMaps => &[
                "google_maps",
                "googleMaps",
                "place_search",
                "placeSearch",
                "geocode",
                "places",
            ],
            RequestKind::XSearch => &[
                "x_search",
                "xSearch",
                "twitter_search",
                "twitterSearch",
                "x_posts",
                "xPosts",
            ],
            RequestKind::CodeExecution => &[
                "code_execution",
                "codeExecution",
                "execute_code",
                "executeCode",
                "python",
                "run_code",
                "runCode",
            ],
            RequestKind::DocumentSearch => &[
                "document_search",
                "documentSearch",
                "search_documents",
                "searchDocuments",
                "file_search",
                "fileSearch",
            ],
            RequestKind::CollectionsSearch => &[
                "collections_search",
                "collectionsSearch",
                "search_collections",
                "searchCollections",
                "knowledge_base",
                "knowledgeBase",
            ],
            RequestKind::ImageGeneration => &[
                "generate_image",
                "generateImage",
                "image_generation",
                "imageGeneration",
                "create_image",
                "createImage",
                "dall_e",
                "dalle",
                "imagen",
                "stable_diffusion",
                "text_to_image",
                "textToImage",
            ],
        }
    }

    fn bump(&self, counts: &mut RequestCounts) {
        let slot = match self {
            RequestKind::WebSearch => &mut counts.web_search,
            RequestKind::GoogleMaps => &mut counts.google_maps,
            RequestKind::XSearch => &mut counts.x_search,
            RequestKind::CodeExecution => &mut counts.code_execution,
            RequestKind::DocumentSearch => &mut counts.document_search,
            RequestKind::CollectionsSearch => &mut counts.collections_search,
            RequestKind::ImageGeneration => &mut counts.image_generations,
        };
        *slot = slot.saturating_add(1);
    }
}

pub trait RequestClassifier: Send + Sync {
    fn classify(&self, tool_name: &str) -> Option<RequestKind>;
}

/// Matches a tool name when it equals or contains a known name, ignoring case.
#[derive(Debug, Clone)]
pub struct NameListClassifier {
    lists: Vec<(RequestKind, Vec<String>)>,
}

impl Default for NameListClassifier {
    fn default() -> Self {
        let lists = RequestKind::ALL
            .iter()
            .map(|kind| {
                let names = kind
                    .default_tool_names()
                    .iter()
                    .map(|n| n.to_lowercase())
                    .collect();
                (*kind, names)
            })
            .collect();
        Self { lists }
    }
}

impl NameListClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tool names for `kind` on top of the defaults.
    pub fn with_names<I, S>(mut self, kind: RequestKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, list)) = self.lists.iter_mut().find(|(k, _)| *k == kind) {
            list.extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        }
        self
    }
}

impl RequestClassifier for NameListClassifier {
    fn classify(&self, tool_name: &str) -> Option<RequestKind> {
        let lower = tool_name.to_lowercase();
        self.lists
            .iter()
            .find(|(_, names)| names.iter().any(|n| lower == *n || lower.contains(n.as_str())))
            .map(|(kind, _)| *kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, alias = "toolName", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ToolCall {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            tool_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.tool_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.kind.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, alias = "toolCalls")]
    pub tool_calls: Vec<ToolCall>,
}

/// Search grounding details reported by Gemini models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingMetadata {
    #[serde(default, alias = "webSearchQueries")]
    pub web_search_queries: Vec<String>,
    #[serde(default, alias = "searchEntryPoint", skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<serde_json::Value>,
}

/// A finished generation: usage plus what the model did to produce it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub usage: Usage,
    #[serde(default, alias = "toolCalls")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, alias = "groundingMetadata", skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl GenerationResult {
    pub fn new(usage: Usage) -> Self {
        Self {
            usage,
            ..Default::default()
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_grounding(mut self, grounding: GroundingMetadata) -> Self {
        self.grounding_metadata = Some(grounding);
        self
    }
}

impl UsageSource for GenerationResult {
    fn usage(&self) -> &Usage {
        &self.usage
    }
}

/// Counts auxiliary requests made during `result`.
pub fn detect_requests(
    result: &GenerationResult,
    classifier: &dyn RequestClassifier,
) -> RequestCounts {
    let mut counts = RequestCounts::default();

    let calls = result
        .tool_calls
        .iter()
        .chain(result.steps.iter().flat_map(|s| s.tool_calls.iter()));
    for call in calls {
        if let Some(kind) = call.label().and_then(|name| classifier.classify(name)) {
            kind.bump(&mut counts);
        }
    }

    if let Some(grounding) = &result.grounding_metadata {
        counts.web_search = counts
            .web_search
            .saturating_add(grounding.web_search_queries.len() as u64);
        if grounding.search_entry_point.is_some() && counts.web_search == 0 {
            counts.web_search = 1;
        }
    }

    counts
}

/// Explicit per-kind counts; unset kinds take the detected value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_search: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_execution: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_search: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_search: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_generations: Option<u64>,
}

impl RequestOverrides {
    pub fn merge_detected(&self, detected: &RequestCounts) -> RequestCounts {
        RequestCounts {
            web_search: self.web_search.unwrap_or(detected.web_search),
            google_maps: self.google_maps.unwrap_or(detected.google_maps),
            x_search: self.x_search.unwrap_or(detected.x_search),
            code_execution: self.code_execution.unwrap_or(detected.code_execution),
            document_search: self.document_search.unwrap_or(detected.document_search),
            collections_search: self
                .collections_search
                .unwrap_or(detected.collections_search),
            image_generations: self.image_generations.unwrap_or(detected.image_generations),
        }
    }
}
