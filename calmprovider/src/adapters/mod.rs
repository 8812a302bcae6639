#[cfg(feature = "provider-gemini")]
pub mod gemini;
