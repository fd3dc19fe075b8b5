//! IAM role properties touched when enabling Lambda@Edge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::OneOrMany;

/// Logical id the Serverless framework gives the shared function role.
pub const EXECUTION_ROLE_LOGICAL_ID: &str = "IamRoleLambdaExecution";
pub const LAMBDA_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";
pub const EDGE_LAMBDA_SERVICE_PRINCIPAL: &str = "edgelambda.amazonaws.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProperties {
    #[serde(rename = "AssumeRolePolicyDocument")]
    pub assume_role_policy: TrustPolicy,
    #[serde(rename = "Policies", default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<InlinePolicy>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Trust statements stay opaque: `Principal` may be `"*"`, an `AWS` account
/// or a service list holding intrinsics, and none of those are rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustPolicy {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Statement", default)]
    pub statements: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Adds the edge principal next to the Lambda principal of one trust statement.
///
/// Returns `true` only when `Principal.Service` trusts Lambda and did not yet
/// trust Lambda@Edge. A single service string is promoted to a list. Any other
/// principal shape is left alone, as are non-string members of the list.
pub fn allow_edge_lambda(statement: &mut Value) -> bool {
    let Some(service) = statement
        .get_mut("Principal")
        .and_then(|principal| principal.get_mut("Service"))
    else {
        return false;
    };

    if service.as_str() == Some(LAMBDA_SERVICE_PRINCIPAL) {
        *service = Value::Array(vec![
            Value::from(LAMBDA_SERVICE_PRINCIPAL),
            Value::from(EDGE_LAMBDA_SERVICE_PRINCIPAL),
        ]);
        return true;
    }

    let Some(services) = service.as_array_mut() else {
        return false;
    };
    let trusts = |principal: &str| services.iter().any(|s| s.as_str() == Some(principal));
    if trusts(LAMBDA_SERVICE_PRINCIPAL) && !trusts(EDGE_LAMBDA_SERVICE_PRINCIPAL) {
        services.push(Value::from(EDGE_LAMBDA_SERVICE_PRINCIPAL));
        true
    } else {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlinePolicy {
    #[serde(rename = "PolicyDocument")]
    pub document: PolicyDocument,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Existing statements are only appended to, never decoded.
    #[serde(rename = "Statement", default)]
    pub statements: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany<String>>,
    /// Resource is frequently an intrinsic (`Fn::Sub`, `Fn::Join`), so it stays untyped.
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn statement(principal: Value) -> Value {
        json!({
            "Effect": "Allow",
            "Principal": principal,
            "Action": ["sts:AssumeRole"]
        })
    }

    #[test]
    fn test_allow_edge_lambda_appends_after_existing_services() {
        let mut stmt = statement(json!({"Service": ["lambda.amazonaws.com"]}));
        assert!(allow_edge_lambda(&mut stmt));
        assert_eq!(
            stmt["Principal"]["Service"],
            json!(["lambda.amazonaws.com", "edgelambda.amazonaws.com"])
        );
        assert_eq!(stmt["Action"], json!(["sts:AssumeRole"]));
    }

    #[test]
    fn test_allow_edge_lambda_promotes_single_service_string() {
        let mut stmt = statement(json!({"Service": "lambda.amazonaws.com"}));
        assert!(allow_edge_lambda(&mut stmt));
        assert_eq!(
            stmt["Principal"]["Service"],
            json!(["lambda.amazonaws.com", "edgelambda.amazonaws.com"])
        );
    }

    #[test]
    fn test_allow_edge_lambda_skips_already_trusted_and_foreign_statements() {
        let mut trusted = statement(json!({
            "Service": ["lambda.amazonaws.com", "edgelambda.amazonaws.com"]
        }));
        assert!(!allow_edge_lambda(&mut trusted));

        let mut foreign = statement(json!({"Service": ["ecs-tasks.amazonaws.com"]}));
        assert!(!allow_edge_lambda(&mut foreign));

        let mut account = statement(json!({"AWS": "arn:aws:iam::123456789012:root"}));
        assert!(!allow_edge_lambda(&mut account));

        let mut no_principal = json!({"Effect": "Allow"});
        assert!(!allow_edge_lambda(&mut no_principal));
    }

    #[test]
    fn test_allow_edge_lambda_leaves_wildcard_and_intrinsic_principals() {
        let mut wildcard = statement(json!("*"));
        let before = wildcard.clone();
        assert!(!allow_edge_lambda(&mut wildcard));
        assert_eq!(wildcard, before);

        let mut intrinsic = statement(json!({"Service": {"Fn::Sub": "lambda.${AWS::URLSuffix}"}}));
        let before = intrinsic.clone();
        assert!(!allow_edge_lambda(&mut intrinsic));
        assert_eq!(intrinsic, before);
    }

    #[test]
    fn test_allow_edge_lambda_keeps_intrinsic_list_members() {
        let mut stmt = statement(json!({"Service": [
            {"Fn::Sub": "states.${AWS::Region}.amazonaws.com"},
            "lambda.amazonaws.com"
        ]}));
        assert!(allow_edge_lambda(&mut stmt));
        assert_eq!(
            stmt["Principal"]["Service"],
            json!([
                {"Fn::Sub": "states.${AWS::Region}.amazonaws.com"},
                "lambda.amazonaws.com",
                "edgelambda.amazonaws.com"
            ])
        );
    }

    #[test]
    fn test_policy_document_keeps_foreign_statements() {
        let raw = json!({
            "Version": "2012-10-17",
            "Statement": [
                {"Fn::If": ["HasBucket", {"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}, {"Ref": "AWS::NoValue"}]},
                {
                    "Effect": "Allow",
                    "Action": ["logs:CreateLogStream", "logs:CreateLogGroup"],
                    "Resource": [{"Fn::Sub": "arn:${AWS::Partition}:logs:${AWS::Region}:${AWS::AccountId}:log-group:/aws/lambda/svc-dev*:*"}]
                }
            ]
        });
        let document: PolicyDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&document).unwrap(), raw);
    }
}
