use nutri_core::error::NutriError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), NutriError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
