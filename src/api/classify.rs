use serde_json::Value;

/// Turn a non-2xx response body into a single user-facing message.
///
/// The body is expected to be JSON; anything unparsable degrades to an
/// empty object rather than surfacing a parse error.
pub fn classify(body: &str) -> String {
    let json: Value =
        serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));

    match json.get("error") {
        Some(Value::Object(fields)) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut lines = Vec::new();
            for (field, messages) in entries {
                let field = capitalize(field);
                let mut texts: Vec<&str> = match messages {
                    Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                    Value::String(text) => vec![text.as_str()],
                    _ => Vec::new(),
                };
                texts.sort_unstable();
                for message in texts {
                    lines.push(format!("- {} {}.", field, message));
                }
            }

            let noun = if lines.len() == 1 {
                "validation"
            } else {
                "validations"
            };
            let mut out = vec![format!("The following {} failed:", noun)];
            out.extend(lines);
            out.join("\n")
        }
        None | Some(Value::Null) => format!("An unexpected error occurred: {}", body),
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
