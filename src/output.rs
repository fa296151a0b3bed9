use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl JsonError {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let (code, message, details) = crate::user_error::anyhow_error_parts_for_envelope(err);
        Self {
            code: code.to_string(),
            message: message.into_owned(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T>
where
    T: Serialize,
{
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: T,
    pub warnings: Vec<String>,
    pub errors: Vec<JsonError>,
}

impl<T> JsonEnvelope<T>
where
    T: Serialize,
{
    pub fn ok(command: impl Into<String>, data: T) -> Self {
        Self {
            ok: true,
            command: command.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl JsonEnvelope<serde_json::Value> {
    pub fn err(command: impl Into<String>, err: &anyhow::Error) -> Self {
        Self {
            ok: false,
            command: command.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data: serde_json::json!({}),
            warnings: Vec::new(),
            errors: vec![JsonError::from_anyhow(err)],
        }
    }
}

pub fn print_json<T>(envelope: &JsonEnvelope<T>) -> anyhow::Result<()>
where
    T: Serialize,
{
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}
