use serde::Serialize;

use crate::error::FactsError;

pub fn render<T: Serialize>(data: &T, format: &str) -> Result<String, FactsError> {
    let text = match format {
        "yaml" => serde_yaml::to_string(data)?,
        _ => serde_json::to_string_pretty(data)?,
    };
    Ok(text)
}

pub fn output_data<T: Serialize>(data: &T, format: &str) -> Result<(), FactsError> {
    println!("{}", render(data, format)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}
