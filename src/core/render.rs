//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let (deps, files): (Vec<&ResultItem>, Vec<&ResultItem>) = result_set
            .items
            .iter()
            .partition(|item| item.kind == Kind::Dependency);

        if !deps.is_empty() {
            output.push_str("## Dependencies\n\n");
            for (i, item) in deps.iter().enumerate() {
                let depth = item
                    .data
                    .as_ref()
                    .and_then(|d| d.get("depth"))
                    .and_then(|d| d.as_u64())
                    .unwrap_or(0) as usize;
                output.push_str(&format!("{}{}. `{}`", "  ".repeat(depth), i + 1, item.path));
                if let Some(range) = &item.range {
                    output.push_str(&format!(" (line {})", range.start));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !files.is_empty() {
            output.push_str("## Files\n\n");
            for item in files {
                output.push_str(&format!("- `{}`", item.path));
                if let Some(size) = item.meta.size {
                    output.push_str(&format!(" ({} bytes)", size));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    /// Render as raw output: one path per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .map(|item| item.path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{RangeLine, SourceMode};
    use serde_json::json;

    fn sample() -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::dependency("js/app.js", SourceMode::Entry));
        result_set.push(
            ResultItem::dependency("js/lib.js", SourceMode::SearchPath)
                .with_range(RangeLine::line(2))
                .with_data(json!({"depth": 1})),
        );
        result_set
    }

    #[test]
    fn test_render_jsonl() {
        let renderer = Renderer::with_config(RenderConfig::new(OutputFormat::Jsonl));
        let output = renderer.render(&sample());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("js/app.js"));
    }

    #[test]
    fn test_render_json_pretty() {
        let renderer = Renderer::with_config(RenderConfig::with_pretty(OutputFormat::Json, true));
        let output = renderer.render(&sample());
        assert!(output.starts_with('['));
        assert!(output.contains("\n  "));
    }

    #[test]
    fn test_render_markdown_indents_by_depth() {
        let renderer = Renderer::with_config(RenderConfig::new(OutputFormat::Markdown));
        let output = renderer.render(&sample());
        assert!(output.contains("## Dependencies"));
        assert!(output.contains("1. `js/app.js`"));
        assert!(output.contains("  2. `js/lib.js` (line 2)"));
    }

    #[test]
    fn test_render_raw() {
        let renderer = Renderer::with_config(RenderConfig::new(OutputFormat::Raw));
        assert_eq!(renderer.render(&sample()), "js/app.js\njs/lib.js");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
