//! Generator - the load → render → invoke → parse pipeline
//!
//! Wires the template loader, renderer, chat client, and response parser
//! into the single public generate operation. One request is processed
//! synchronously and sequentially; nothing is shared across requests.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::error::Result;
use crate::llm::ChatClient;
use crate::response::{ExtractionStrategy, ParsedResponse, parse_response};
use crate::template::{TemplateLoader, render};

/// Placeholder bound by [`Generator::generate`]
const USER_DESCRIPTION_KEY: &str = "user_description";

/// Template used when none is configured
const DEFAULT_TEMPLATE: &str = "resume_prompt";

/// Runs the full prompt pipeline against a chat endpoint
pub struct Generator {
    loader: TemplateLoader,
    client: Arc<dyn ChatClient>,
    strategy: ExtractionStrategy,
    template: String,
}

impl Generator {
    /// Create a new Generator
    pub fn new(
        loader: TemplateLoader,
        client: Arc<dyn ChatClient>,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            loader,
            client,
            strategy,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Use a template other than the default
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = name.into();
        self
    }

    /// Get the configured template name
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Get the configured extraction strategy
    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    /// Run the full pipeline for a single user description
    ///
    /// Binds the description to the `{user_description}` placeholder of the
    /// configured template. Template and transport failures propagate; parse
    /// failures are soft and land inside the returned response.
    pub async fn generate(&self, user_description: &str) -> Result<ParsedResponse> {
        let mut values = HashMap::new();
        values.insert(
            USER_DESCRIPTION_KEY.to_string(),
            user_description.to_string(),
        );
        self.generate_with(&self.template, &values).await
    }

    /// Run the pipeline with an explicit template and substitution map
    pub async fn generate_with(
        &self,
        template: &str,
        values: &HashMap<String, String>,
    ) -> Result<ParsedResponse> {
        let text = self.loader.load(template)?;
        let prompt = render(&text, values);
        debug!(
            "Rendered template '{}' into prompt ({} chars)",
            template,
            prompt.len()
        );

        let raw = self.client.invoke(&prompt).await?;
        info!("Chat response received ({} chars)", raw.len());

        Ok(parse_response(&raw, self.strategy))
    }
}
