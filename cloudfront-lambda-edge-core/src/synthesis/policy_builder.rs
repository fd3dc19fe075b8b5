//! Builds the log permissions statement for replicated edge functions.
//!
//! Replicas write to log groups named after the edge region they run in
//! (`/aws/lambda/us-east-1.<function>` in every region), which the
//! framework-generated log permissions do not cover. The names are not known
//! before replication, so the grant covers any log group.

use serde_json::Value;

use crate::template::iam::PolicyStatement;
use crate::types::OneOrMany;

pub const EDGE_LOG_ACTIONS: [&str; 4] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
    "logs:DescribeLogStreams",
];

pub const EDGE_LOG_RESOURCE: &str = "arn:aws:logs:*:*:*";

pub fn build_edge_log_statement() -> PolicyStatement {
    PolicyStatement {
        effect: "Allow".to_string(),
        action: Some(OneOrMany::Many(
            EDGE_LOG_ACTIONS.iter().map(ToString::to_string).collect(),
        )),
        resource: Some(Value::String(EDGE_LOG_RESOURCE.to_string())),
        extra: serde_json::Map::new(),
    }
}
