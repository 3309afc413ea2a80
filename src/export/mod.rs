pub mod delimited;
pub mod json;
pub mod layout;
pub mod pdf;

/// Whole numbers print without a fractional part (`300`), others in
/// shortest form (`72.5`).
pub fn format_score(value: f64) -> String {
    if value == 0.0 {
        // 避免輸出 -0
        return "0".to_string();
    }
    format!("{}", value)
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.2}", value)
}
