//! Clipboard notes describing the environment variables a binding adds

/// Note for a plain Service binding
pub fn service_usage(binding_name: &str) -> String {
    format!(
        "// To use service {}, we added an environment variable containing the DNS hostname: SERVICE_{}",
        binding_name,
        binding_name.to_uppercase()
    )
}

/// Note for a service-catalog binding, one line per secret key
pub fn catalog_usage(binding_name: &str, secret_keys: &[String]) -> String {
    let variables: Vec<String> = secret_keys
        .iter()
        .map(|key| format!("// {}_{}", binding_name, key).to_uppercase())
        .collect();

    format!(
        "// To use service {}, we added a number of environment variables\n// to your application, as listed below:\n{}",
        binding_name,
        variables.join("\n")
    )
}
