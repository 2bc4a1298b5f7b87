use crate::error::UnitFailure;
use crate::import::CreatedComponent;
use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(success: usize, failure: usize) -> Self {
        match (success, failure) {
            (_, f) if f > 0 => Self {
                prefix: "✗".red().to_string(),
                message: format!("{} created, {} failed", success.green(), f.red()),
            },
            (s, _) if s > 0 => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} component(s) created", s.green()),
            },
            _ => Self {
                prefix: "•".yellow().to_string(),
                message: "No manifests found".to_string(),
            },
        }
    }
}

impl std::fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}

/// 作成したコンポーネント1件分の行
pub fn created_line(created: &CreatedComponent) -> String {
    format!(
        "  {} {} -> {}",
        "✓".green(),
        created.source_name,
        created.component_name.bold()
    )
}

/// 失敗したユニット1件分の行
pub fn failure_line(failure: &UnitFailure) -> String {
    format!(
        "  {} {}: {}",
        "✗".red(),
        failure.source_name,
        failure.cause.to_string().red()
    )
}
