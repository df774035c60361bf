//! Explain output for an expansion
//!
//! Structured JSON and human-readable reports of where each argument of an
//! expanded invocation came from.

use serde::{Deserialize, Serialize};

use super::{ArgOrigin, ResolvedArg};
use crate::rcfile::RcSource;

/// Explanation of one expanded invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainOutput {
    /// The arguments as given
    pub input_argv: Vec<String>,

    /// The command token, if one was found
    pub command: Option<String>,

    /// The fully expanded argument list
    pub expanded_argv: Vec<String>,

    /// Each expanded argument with its origin
    pub args: Vec<ResolvedArg>,

    /// rc files read, in read order
    pub sources: Vec<RcSource>,

    /// Human-readable explanation
    pub explanation: String,
}

impl ExplainOutput {
    pub fn new(
        input_argv: Vec<String>,
        command: Option<String>,
        args: Vec<ResolvedArg>,
        sources: Vec<RcSource>,
    ) -> Self {
        let expanded_argv: Vec<String> = args.iter().map(|a| a.value.clone()).collect();
        let explanation = Self::generate_explanation(&input_argv, command.as_deref(), &args);

        Self {
            input_argv,
            command,
            expanded_argv,
            args,
            sources,
            explanation,
        }
    }

    fn generate_explanation(
        argv: &[String],
        command: Option<&str>,
        args: &[ResolvedArg],
    ) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Command line: {}", argv.join(" ")));
        lines.push(format!("Command: {}", command.unwrap_or("(none)")));
        lines.push(String::new());

        let from_rc = args
            .iter()
            .filter(|a| matches!(a.origin, ArgOrigin::Rc { .. }))
            .count();
        lines.push(format!(
            "Expanded to {} argument(s), {} from rc files:",
            args.len(),
            from_rc
        ));

        for arg in args {
            lines.push(format!("  {:<40} {}", arg.value, Self::format_origin(&arg.origin)));
        }

        lines.join("\n")
    }

    /// Format an origin for human reading
    fn format_origin(origin: &ArgOrigin) -> String {
        match origin {
            ArgOrigin::CommandLine => "(command line)".to_string(),
            ArgOrigin::Rc {
                path,
                line,
                command,
                configs,
            } => {
                let mut out = format!("{}:{} [{}]", path.display(), line, command);
                if !configs.is_empty() {
                    out.push_str(&format!(" via --config={}", configs.join(" -> ")));
                }
                out
            }
        }
    }

    /// Format as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut output = self.explanation.clone();
        output.push_str("\n\n--- rc files ---\n");

        if self.sources.is_empty() {
            output.push_str("(none)\n");
        }
        for source in &self.sources {
            output.push_str(&format!(
                "{} ({:?}, sha256 {})\n",
                source.path.display(),
                source.kind,
                &source.digest[..source.digest.len().min(12)]
            ));
        }

        output
    }
}
