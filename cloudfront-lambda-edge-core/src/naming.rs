//! Logical-id derivation and stage lookup supplied by the host framework.

/// Maps a declared function name to the logical ids the host generated for it.
pub trait NamingResolver {
    /// Logical id of the function's `AWS::Lambda::Function` resource.
    fn function_logical_id(&self, function_name: &str) -> String;

    /// Logical id of the output that holds the function's version reference.
    fn version_output_logical_id(&self, function_name: &str) -> String;
}

/// Returns the deployment stage used when building export names.
pub trait StageProvider {
    fn stage(&self) -> &str;
}

impl StageProvider for &str {
    fn stage(&self) -> &str {
        self
    }
}

impl StageProvider for String {
    fn stage(&self) -> &str {
        self
    }
}

/// The Serverless framework's naming conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerlessNaming;

impl ServerlessNaming {
    /// `my-func_v2` becomes `MyDashfuncUnderscorev2`.
    pub fn normalized_function_name(function_name: &str) -> String {
        let replaced = function_name.replace('-', "Dash").replace('_', "Underscore");
        let mut chars = replaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl NamingResolver for ServerlessNaming {
    fn function_logical_id(&self, function_name: &str) -> String {
        format!("{}LambdaFunction", Self::normalized_function_name(function_name))
    }

    fn version_output_logical_id(&self, function_name: &str) -> String {
        format!("{}QualifiedArn", self.function_logical_id(function_name))
    }
}
